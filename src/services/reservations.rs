use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{ReservationError, ReservationResult};
use crate::models::{BookingStatus, ShowSeat};
use crate::store;

/// Seat allocation and booking lifecycle.
///
/// The engine holds no mutable state of its own; all shared state lives in
/// Postgres and every operation runs as one transaction, so concurrent
/// callers are serialized by row locks on the seats they touch. A failed
/// operation commits nothing.
#[derive(Clone)]
pub struct ReservationEngine {
    pool: PgPool,
}

impl ReservationEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Books `seats` of a showing for `email` under a fresh booking id.
    ///
    /// All-or-nothing: either every requested seat ends up owned by the new
    /// booking and the row is created with a matching seat count, or the
    /// transaction rolls back untouched. When two calls race over a shared
    /// seat, the row locks guarantee exactly one wins; the loser sees
    /// `SeatAlreadyBooked` for the contested seats.
    pub async fn book(
        &self,
        show_id: i64,
        seats: &[i32],
        email: &str,
        status: BookingStatus,
    ) -> ReservationResult<i64> {
        let seats = normalize_seats(seats)?;

        let mut tx = self.pool.begin().await?;

        if !store::account_exists(&mut *tx, email).await? {
            return Err(ReservationError::AccountNotFound(email.to_string()));
        }
        if !store::show_exists(&mut *tx, show_id).await? {
            return Err(ReservationError::ShowingNotFound(show_id));
        }

        let locked = store::seats_for_update(&mut *tx, show_id, &seats).await?;
        check_requested_seats(show_id, &seats, &locked, None)?;

        let booking_id =
            store::insert_booking(&mut *tx, status, seats.len() as i32, show_id, email).await?;
        let claimed = store::claim_free_seats(&mut *tx, show_id, &seats, booking_id).await?;
        if claimed != seats.len() as u64 {
            // the locks above make this unreachable; bail without committing
            return Err(ReservationError::Conflict);
        }

        tx.commit().await?;
        info!(booking_id, show_id, seats = seats.len(), "booking created");
        Ok(booking_id)
    }

    /// Replaces the booking's seat set with `new_seats`, price-neutrally.
    ///
    /// Seats already held by this booking may be re-selected. The swap is
    /// atomic: the booking never observably holds a mixed old/new set, and
    /// on any failure the old set stays intact.
    pub async fn reassign(&self, booking_id: i64, new_seats: &[i32]) -> ReservationResult<()> {
        let new_seats = normalize_seats(new_seats)?;

        let mut tx = self.pool.begin().await?;

        let booking = store::booking_for_update(&mut *tx, booking_id)
            .await?
            .ok_or(ReservationError::BookingNotFound(booking_id))?;

        let current = store::seats_of_booking_for_update(&mut *tx, booking_id).await?;
        let requested = store::seats_for_update(&mut *tx, booking.show_id, &new_seats).await?;
        check_requested_seats(booking.show_id, &new_seats, &requested, Some(booking_id))?;

        let current_total: i64 = current.iter().map(|s| s.price).sum();
        let requested_total: i64 = requested.iter().map(|s| s.price).sum();
        if current_total != requested_total {
            return Err(ReservationError::PriceMismatch {
                current: current_total,
                requested: requested_total,
            });
        }

        store::release_seats_of(&mut *tx, booking_id).await?;
        let claimed =
            store::claim_free_seats(&mut *tx, booking.show_id, &new_seats, booking_id).await?;
        if claimed != new_seats.len() as u64 {
            return Err(ReservationError::Conflict);
        }
        store::set_seat_count(&mut *tx, booking_id, new_seats.len() as i32).await?;

        tx.commit().await?;
        info!(booking_id, seats = new_seats.len(), "booking reassigned");
        Ok(())
    }

    /// Cancels one booking, releasing all of its seats in the same
    /// transaction. A no-op on already-Cancelled bookings.
    pub async fn release_booking(&self, booking_id: i64) -> ReservationResult<()> {
        let mut tx = self.pool.begin().await?;

        let booking = store::booking_for_update(&mut *tx, booking_id)
            .await?
            .ok_or(ReservationError::BookingNotFound(booking_id))?;
        if booking.status == BookingStatus::Cancelled.as_str() {
            return Ok(());
        }

        let freed = store::release_seats_of(&mut *tx, booking_id).await?;
        store::set_status_cancelled(&mut *tx, booking_id).await?;

        tx.commit().await?;
        info!(booking_id, freed, "booking cancelled");
        Ok(())
    }

    /// Cancels every Pending booking, releasing its seats. Returns the
    /// number of bookings cancelled.
    ///
    /// Each booking is swept in its own transaction behind its row lock, so
    /// a concurrent `book`/`reassign` on the same booking is serialized
    /// against the sweep rather than torn by it. A booking whose status
    /// changed since it was listed is skipped.
    pub async fn release_stale_pending(&self) -> ReservationResult<u64> {
        let pending = store::pending_booking_ids(&self.pool).await?;
        let mut released = 0u64;

        for booking_id in pending {
            let mut tx = self.pool.begin().await?;
            let Some(booking) = store::booking_for_update(&mut *tx, booking_id).await? else {
                continue;
            };
            if booking.status != BookingStatus::Pending.as_str() {
                warn!(booking_id, status = %booking.status, "booking changed during sweep, skipped");
                continue;
            }

            let freed = store::release_seats_of(&mut *tx, booking_id).await?;
            store::set_status_cancelled(&mut *tx, booking_id).await?;
            tx.commit().await?;

            released += 1;
            info!(booking_id, freed, "pending booking released");
        }

        Ok(released)
    }

    /// Deletes every Cancelled booking row and returns the count. No seat
    /// release happens here: a Cancelled booking owns zero seats, and the
    /// seat FK turns any violation of that invariant into a hard error
    /// instead of a silent orphan.
    pub async fn purge_cancelled(&self) -> ReservationResult<u64> {
        let removed = store::delete_cancelled(&self.pool).await?;
        info!(removed, "cancelled bookings purged");
        Ok(removed)
    }
}

/// Sorted, duplicate-checked copy of a requested seat set. Sorting keeps
/// row-lock acquisition order identical across concurrent calls.
fn normalize_seats(seats: &[i32]) -> ReservationResult<Vec<i32>> {
    if seats.is_empty() {
        return Err(ReservationError::EmptySeatSet);
    }
    let mut seats = seats.to_vec();
    seats.sort_unstable();
    for pair in seats.windows(2) {
        if pair[0] == pair[1] {
            return Err(ReservationError::DuplicateSeat(pair[0]));
        }
    }
    Ok(seats)
}

/// Classifies the locked seat rows against the request: every requested
/// seat must exist, and must be free or owned by `own_booking`. Reports
/// the full list of offending seats, not just the first.
fn check_requested_seats(
    show_id: i64,
    requested: &[i32],
    locked: &[ShowSeat],
    own_booking: Option<i64>,
) -> ReservationResult<()> {
    let missing: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|n| !locked.iter().any(|s| s.seat_no == *n))
        .collect();
    if !missing.is_empty() {
        return Err(ReservationError::SeatNotFound { show_id, seats: missing });
    }

    let taken: Vec<i32> = locked
        .iter()
        .filter(|s| s.booking_id.is_some() && s.booking_id != own_booking)
        .map(|s| s.seat_no)
        .collect();
    if !taken.is_empty() {
        return Err(ReservationError::SeatAlreadyBooked { seats: taken });
    }

    Ok(())
}
