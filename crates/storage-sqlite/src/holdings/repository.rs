use trackfolio_core::holdings::{Holding, HoldingPriceUpdate, HoldingRepositoryTrait, NewHolding};
use trackfolio_core::Result;

use super::model::{HoldingDB, NewHoldingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::holdings;
use crate::schema::holdings::dsl::*;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        HoldingRepository { pool, writer }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn get_holding(&self, holding_id: &str) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;
        let holding_db = holdings
            .find(holding_id)
            .select(HoldingDB::as_select())
            .first::<HoldingDB>(&mut conn)
            .into_core()?;
        Ok(Holding::from(holding_db))
    }

    fn list_refresh_eligible(&self) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let holdings_db = holdings
            .filter(has_shares.eq(true).or(is_in_watchlist.eq(true)))
            .order((created_at.asc(), id.asc()))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(holdings_db.into_iter().map(Holding::from).collect())
    }

    fn list_active_positions(&self, owner_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let holdings_db = holdings
            .filter(user_id.eq(owner_id))
            .filter(has_shares.eq(true))
            .filter(is_in_watchlist.eq(false))
            .order((created_at.asc(), id.asc()))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(holdings_db.into_iter().map(Holding::from).collect())
    }

    async fn insert_holding(&self, new_holding: NewHolding) -> Result<Holding> {
        let new_holding = new_holding.validate()?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                let new_holding_db =
                    NewHoldingDB::from_domain(new_holding, Uuid::new_v4().to_string());

                let result_db = diesel::insert_into(holdings::table)
                    .values(&new_holding_db)
                    .returning(HoldingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Holding::from(result_db))
            })
            .await
    }

    async fn update_price(&self, holding_id: &str, update: HoldingPriceUpdate) -> Result<usize> {
        let holding_id = holding_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(holdings.find(holding_id))
                    .set((
                        current_price.eq(Some(update.current_price.to_string())),
                        last_updated.eq(Some(update.last_updated.naive_utc())),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn delete_holding(&self, holding_id: &str) -> Result<usize> {
        let holding_id = holding_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(holdings.find(holding_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
