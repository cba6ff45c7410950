//! Fractional ordering of page-builder containers.
//!
//! Containers keep a sparse floating-point `display_order` key so a move only
//! recomputes one key (a gap midpoint) instead of renumbering the page.
//! Repeated opposing moves on the same pair halve the gap each time; there is
//! no automatic rebalance, only the explicit `rebalance` operation.

use crate::error::AppError;
use serde::Serialize;
use sqlx::PgPool;

/// Gap between keys assigned on insert and after `rebalance`.
pub const ORDER_STEP: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// New key for the container at `index` within `keys` (sorted ascending),
/// or None when the move is a boundary no-op.
///
/// Moving up lands in the gap immediately before the upward neighbor: the
/// midpoint of the two keys above, or half the first key when the target
/// becomes first. Down is symmetric, with `last + ORDER_STEP` when the
/// target becomes last.
pub fn moved_key(keys: &[f64], index: usize, direction: MoveDirection) -> Option<f64> {
    match direction {
        MoveDirection::Up => match index {
            0 => None,
            1 => Some(keys[0] / 2.0),
            _ => Some((keys[index - 2] + keys[index - 1]) / 2.0),
        },
        MoveDirection::Down => {
            let last = keys.len() - 1;
            if index == last {
                None
            } else if index == last - 1 {
                Some(keys[last] + ORDER_STEP)
            } else {
                Some((keys[index + 1] + keys[index + 2]) / 2.0)
            }
        }
    }
}

/// A page-builder content block. Position within its page is determined by
/// `display_order`.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Container {
    pub id: i64,
    pub page_id: i64,
    pub kind: String,
    pub display_order: f64,
}

pub struct ContainerService;

impl ContainerService {
    /// Attach a container to a page. The key is the page's max key plus
    /// ORDER_STEP, or ORDER_STEP for an empty page; assigned in one
    /// statement so concurrent adds cannot read a stale max.
    pub async fn add(pool: &PgPool, page_id: i64, kind: &str) -> Result<Container, AppError> {
        let row = sqlx::query_as::<_, Container>(
            "INSERT INTO containers (page_id, kind, display_order) \
             VALUES ($1, $2, COALESCE((SELECT MAX(display_order) FROM containers WHERE page_id = $1), 0) + $3) \
             RETURNING id, page_id, kind, display_order",
        )
        .bind(page_id)
        .bind(kind)
        .bind(ORDER_STEP)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Containers of a page in display order.
    pub async fn list(pool: &PgPool, page_id: i64) -> Result<Vec<Container>, AppError> {
        let rows = sqlx::query_as::<_, Container>(
            "SELECT id, page_id, kind, display_order FROM containers \
             WHERE page_id = $1 ORDER BY display_order",
        )
        .bind(page_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn move_up(pool: &PgPool, page_id: i64, id: i64) -> Result<Container, AppError> {
        Self::move_container(pool, page_id, id, MoveDirection::Up).await
    }

    pub async fn move_down(pool: &PgPool, page_id: i64, id: i64) -> Result<Container, AppError> {
        Self::move_container(pool, page_id, id, MoveDirection::Down).await
    }

    /// One reorder: lock the page's containers, recompute the target's key,
    /// write it back. The whole read-modify-write runs in a single
    /// transaction so concurrent reorders on the same page serialize.
    async fn move_container(
        pool: &PgPool,
        page_id: i64,
        id: i64,
        direction: MoveDirection,
    ) -> Result<Container, AppError> {
        let mut tx = pool.begin().await?;
        let rows = sqlx::query_as::<_, Container>(
            "SELECT id, page_id, kind, display_order FROM containers \
             WHERE page_id = $1 ORDER BY display_order FOR UPDATE",
        )
        .bind(page_id)
        .fetch_all(&mut *tx)
        .await?;
        let index = rows
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("container {} in page {}", id, page_id)))?;
        let keys: Vec<f64> = rows.iter().map(|c| c.display_order).collect();
        let mut moved = rows[index].clone();
        if let Some(key) = moved_key(&keys, index, direction) {
            sqlx::query("UPDATE containers SET display_order = $1 WHERE id = $2")
                .bind(key)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            moved.display_order = key;
            tracing::debug!(container = id, page = page_id, key, "container moved");
        }
        tx.commit().await?;
        Ok(moved)
    }

    /// Renumber a page's containers to ORDER_STEP, 2*ORDER_STEP, ... in one
    /// transaction. Maintenance operation for pages with deep reorder
    /// histories whose gaps have shrunk; never invoked automatically.
    pub async fn rebalance(pool: &PgPool, page_id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let rows = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM containers WHERE page_id = $1 ORDER BY display_order FOR UPDATE",
        )
        .bind(page_id)
        .fetch_all(&mut *tx)
        .await?;
        for (i, (id,)) in rows.iter().enumerate() {
            sqlx::query("UPDATE containers SET display_order = $1 WHERE id = $2")
                .bind((i as f64 + 1.0) * ORDER_STEP)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
