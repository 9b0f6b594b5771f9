//! Narrow transactional interface over the seat/booking tables.
//!
//! Every mutation here is a typed, parameterized statement. The engine
//! composes these inside a single Postgres transaction per operation;
//! multi-seat claims rely on `FOR UPDATE` row locks plus a claim that
//! only fires where the seat is currently free, which together give the
//! compare-and-set the reservation protocol depends on.

use sqlx::PgExecutor;

use crate::models::{Booking, BookingStatus, ShowSeat};

/* ---------- existence probes ---------- */

pub async fn account_exists<'e>(ex: impl PgExecutor<'e>, email: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(ex)
        .await
}

pub async fn show_exists<'e>(ex: impl PgExecutor<'e>, show_id: i64) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM shows WHERE id = $1)")
        .bind(show_id)
        .fetch_one(ex)
        .await
}

pub async fn theater_exists<'e>(ex: impl PgExecutor<'e>, theater_id: i64) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM theaters WHERE id = $1)")
        .bind(theater_id)
        .fetch_one(ex)
        .await
}

/* ---------- seats ---------- */

/// Locks and reads the requested seat rows of a showing. Seats absent
/// from the result do not exist in the seat map.
pub async fn seats_for_update<'e>(
    ex: impl PgExecutor<'e>,
    show_id: i64,
    seat_nos: &[i32],
) -> sqlx::Result<Vec<ShowSeat>> {
    sqlx::query_as::<_, ShowSeat>(
        "SELECT show_id, seat_no, price, booking_id
         FROM show_seats
         WHERE show_id = $1 AND seat_no = ANY($2)
         ORDER BY seat_no
         FOR UPDATE",
    )
    .bind(show_id)
    .bind(seat_nos)
    .fetch_all(ex)
    .await
}

/// Locks and reads every seat currently owned by a booking.
pub async fn seats_of_booking_for_update<'e>(
    ex: impl PgExecutor<'e>,
    booking_id: i64,
) -> sqlx::Result<Vec<ShowSeat>> {
    sqlx::query_as::<_, ShowSeat>(
        "SELECT show_id, seat_no, price, booking_id
         FROM show_seats
         WHERE booking_id = $1
         ORDER BY seat_no
         FOR UPDATE",
    )
    .bind(booking_id)
    .fetch_all(ex)
    .await
}

/// Conditional claim: assigns the booking only to seats that are still
/// free. Returns the number of seats claimed; the caller compares it
/// against the request size.
pub async fn claim_free_seats<'e>(
    ex: impl PgExecutor<'e>,
    show_id: i64,
    seat_nos: &[i32],
    booking_id: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(
        "UPDATE show_seats
         SET booking_id = $3
         WHERE show_id = $1 AND seat_no = ANY($2) AND booking_id IS NULL",
    )
    .bind(show_id)
    .bind(seat_nos)
    .bind(booking_id)
    .execute(ex)
    .await?;
    Ok(res.rows_affected())
}

/// Frees every seat owned by the booking. Returns the number released.
pub async fn release_seats_of<'e>(
    ex: impl PgExecutor<'e>,
    booking_id: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query("UPDATE show_seats SET booking_id = NULL WHERE booking_id = $1")
        .bind(booking_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

/* ---------- bookings ---------- */

/// Inserts a booking row. The id comes from the table's sequence, so it
/// is strictly greater than any id ever issued and never reused.
pub async fn insert_booking<'e>(
    ex: impl PgExecutor<'e>,
    status: BookingStatus,
    seat_count: i32,
    show_id: i64,
    email: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO bookings (status, seat_count, show_id, email)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(status.as_str())
    .bind(seat_count)
    .bind(show_id)
    .bind(email)
    .fetch_one(ex)
    .await
}

pub async fn booking_for_update<'e>(
    ex: impl PgExecutor<'e>,
    booking_id: i64,
) -> sqlx::Result<Option<Booking>> {
    sqlx::query_as::<_, Booking>(
        "SELECT id, status, email, show_id, seat_count, created_at
         FROM bookings
         WHERE id = $1
         FOR UPDATE",
    )
    .bind(booking_id)
    .fetch_optional(ex)
    .await
}

pub async fn set_seat_count<'e>(
    ex: impl PgExecutor<'e>,
    booking_id: i64,
    seat_count: i32,
) -> sqlx::Result<u64> {
    let res = sqlx::query("UPDATE bookings SET seat_count = $2 WHERE id = $1")
        .bind(booking_id)
        .bind(seat_count)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn set_status_cancelled<'e>(
    ex: impl PgExecutor<'e>,
    booking_id: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
        .bind(booking_id)
        .bind(BookingStatus::Cancelled.as_str())
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn pending_booking_ids<'e>(ex: impl PgExecutor<'e>) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM bookings WHERE status = $1 ORDER BY id")
        .bind(BookingStatus::Pending.as_str())
        .fetch_all(ex)
        .await
}

/// Drops every Cancelled booking row. The seat FK makes this fail hard
/// if a Cancelled booking somehow still owns seats.
pub async fn delete_cancelled<'e>(ex: impl PgExecutor<'e>) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM bookings WHERE status = $1")
        .bind(BookingStatus::Cancelled.as_str())
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}
