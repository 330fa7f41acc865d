//! Chequeo de conflictos de fechas
//!
//! Este módulo implementa la lógica pura de solapamiento de rangos
//! semiabiertos `[start, end)`. Dos rangos entran en conflicto solo si
//! comparten más que un instante de frontera: un alquiler que termina
//! el día 5 no choca con otro que empieza el día 5.

use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::errors::{AppError, AppResult};

/// Rango de fechas semiabierto `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Construye un rango validando `start < end`.
    ///
    /// Un rango de longitud cero o invertido se rechaza con
    /// `InvalidRange`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidRange(format!(
                "start date {} must be before end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Test de solapamiento semiabierto: `a.start < b.end && a.end > b.start`.
    /// Simétrico; los extremos que solo se tocan no cuentan.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Valida un rango para bloqueo de calendario: además de `start < end`,
/// el inicio no puede estar en el pasado. La fecha de referencia se
/// inyecta para poder testear sin depender del reloj.
pub fn validate_block_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> AppResult<DateRange> {
    let range = DateRange::new(start, end)?;
    if range.start < today {
        return Err(AppError::InvalidRange(format!(
            "start date {} is in the past",
            range.start
        )));
    }
    Ok(range)
}

/// Busca el primer rango existente que solape con el candidato.
pub fn find_conflict<'a, I>(candidate: &DateRange, existing: I) -> Option<&'a DateRange>
where
    I: IntoIterator<Item = &'a DateRange>,
{
    existing.into_iter().find(|range| candidate.overlaps(range))
}

/// Rechaza el candidato con `Conflict` si solapa con algún rango existente.
pub fn ensure_no_conflict<'a, I>(candidate: &DateRange, existing: I) -> AppResult<()>
where
    I: IntoIterator<Item = &'a DateRange>,
{
    if let Some(overlap) = find_conflict(candidate, existing) {
        return Err(AppError::Conflict(format!(
            "dates {} to {} overlap an existing blocked range {} to {}",
            candidate.start, candidate.end, overlap.start, overlap.end
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2)).unwrap()
    }

    #[test]
    fn overlap_is_symmetric() {
        let ranges = [
            range((2024, 6, 1), (2024, 6, 5)),
            range((2024, 6, 4), (2024, 6, 8)),
            range((2024, 6, 5), (2024, 6, 8)),
            range((2024, 5, 1), (2024, 7, 1)),
        ];
        for a in &ranges {
            for b in &ranges {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn range_overlaps_itself() {
        let a = range((2024, 6, 1), (2024, 6, 5));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        let blocked = range((2024, 6, 1), (2024, 6, 5));
        let candidate = range((2024, 6, 5), (2024, 6, 8));
        assert!(!candidate.overlaps(&blocked));
        assert!(find_conflict(&candidate, [&blocked]).is_none());
    }

    #[test]
    fn one_day_overlap_conflicts() {
        // Escenario: bloqueado [2024-06-01, 2024-06-05), candidato
        // [2024-06-04, 2024-06-08) -> chocan en el 4 de junio.
        let blocked = range((2024, 6, 1), (2024, 6, 5));
        let candidate = range((2024, 6, 4), (2024, 6, 8));
        assert!(candidate.overlaps(&blocked));

        let err = ensure_no_conflict(&candidate, [&blocked]).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn contained_range_conflicts() {
        let outer = range((2024, 6, 1), (2024, 6, 30));
        let inner = range((2024, 6, 10), (2024, 6, 12));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&inner));
    }

    #[test]
    fn zero_length_range_is_rejected() {
        let d = date(2024, 6, 1);
        assert!(matches!(
            DateRange::new(d, d),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            DateRange::new(date(2024, 6, 5), date(2024, 6, 1)),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn past_start_is_rejected_for_blocks() {
        let today = date(2024, 6, 10);
        assert!(matches!(
            validate_block_range(date(2024, 6, 1), date(2024, 6, 15), today),
            Err(AppError::InvalidRange(_))
        ));
        assert!(validate_block_range(date(2024, 6, 10), date(2024, 6, 15), today).is_ok());
    }

    #[test]
    fn find_conflict_returns_first_overlap() {
        let existing = [
            range((2024, 6, 1), (2024, 6, 5)),
            range((2024, 6, 10), (2024, 6, 15)),
        ];
        let candidate = range((2024, 6, 12), (2024, 6, 20));
        let hit = find_conflict(&candidate, existing.iter()).unwrap();
        assert_eq!(hit.start, date(2024, 6, 10));
    }

    #[test]
    fn disjoint_set_stays_disjoint_after_valid_insert() {
        // Propiedad: si cada candidato pasa ensure_no_conflict antes de
        // insertarse, el conjunto se mantiene disjunto dos a dos.
        let mut blocked: Vec<DateRange> = vec![];
        let candidates = [
            range((2024, 6, 1), (2024, 6, 5)),
            range((2024, 6, 5), (2024, 6, 8)),
            range((2024, 6, 4), (2024, 6, 6)), // choca, no se inserta
            range((2024, 6, 20), (2024, 6, 25)),
        ];
        for candidate in candidates {
            if ensure_no_conflict(&candidate, blocked.iter()).is_ok() {
                blocked.push(candidate);
            }
        }
        assert_eq!(blocked.len(), 3);
        for (i, a) in blocked.iter().enumerate() {
            for b in blocked.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
    }
}
