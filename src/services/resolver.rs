//! Cell address resolution.
//!
//! Maps a `(timestamp, price)` domain point to its grid cell and back,
//! relative to an explicitly passed session anchor. Addressing is
//! time-absolute: the viewport never participates, so the same domain point
//! resolves to the same cell no matter how the user has panned or zoomed.

use crate::error::{EngineError, Result};
use crate::types::{CellBounds, CellId, GridSession};

/// Resolve a domain point to its grid cell.
///
/// `price` must be positive and the session's price step non-degenerate;
/// both are contract violations, not clampable inputs. Timestamps before the
/// session anchor resolve to negative `cell_x` (history columns).
pub fn resolve(timestamp_secs: i64, price: i64, session: &GridSession) -> Result<CellId> {
    let step = price_step(session)?;
    if price <= 0 {
        return Err(EngineError::InvalidPrice(price));
    }

    let column = session.column_duration_secs();
    let cell_x = (timestamp_secs - session.reference_time).div_euclid(column);

    let price_level = price.div_euclid(step);
    let reference_level = session.reference_price.div_euclid(step);
    let cell_y = price_level - reference_level;

    Ok(CellId::new(cell_x, cell_y))
}

/// Inverse of [`resolve`]: the canonical rectangle a cell covers.
pub fn to_bounds(cell: CellId, session: &GridSession) -> Result<CellBounds> {
    let step = price_step(session)?;
    let column = session.column_duration_secs();

    let start_time = session.reference_time + cell.cell_x * column;
    let reference_level = session.reference_price.div_euclid(step);
    let price_low = (reference_level + cell.cell_y) * step;

    Ok(CellBounds {
        start_time,
        end_time: start_time + column,
        price_low,
        price_high: price_low + step,
    })
}

fn price_step(session: &GridSession) -> Result<i64> {
    let step = session.price_step();
    if step <= 0 || session.column_duration_secs() < 1 {
        return Err(EngineError::InvalidSessionParameters(format!(
            "degenerate grid geometry for session {}",
            session.id
        )));
    }
    Ok(step)
}
