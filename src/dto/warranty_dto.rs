use serde::{Deserialize, Serialize};

/// Resumen de garantías por estado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantySummary {
    pub in_warranty: i64,
    pub out_of_warranty: i64,
    pub expiring_soon: i64,
    pub total: i64,
}

impl WarrantySummary {
    /// Porcentaje sobre el total, derivado solo para presentación
    pub fn percent_of_total(&self, count: i64) -> f64 {
        if self.total <= 0 {
            return 0.0;
        }
        (count as f64 / self.total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_total() {
        let summary = WarrantySummary {
            in_warranty: 3,
            out_of_warranty: 1,
            expiring_soon: 1,
            total: 5,
        };
        assert!((summary.percent_of_total(summary.in_warranty) - 60.0).abs() < f64::EPSILON);
        assert!((summary.percent_of_total(summary.expiring_soon) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_of_total_empty() {
        let summary = WarrantySummary {
            in_warranty: 0,
            out_of_warranty: 0,
            expiring_soon: 0,
            total: 0,
        };
        assert_eq!(summary.percent_of_total(0), 0.0);
    }
}
