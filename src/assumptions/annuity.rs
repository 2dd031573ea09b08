//! Annuity present-value factors and the statutory retirement-age ramp
//!
//! Both tables are plain data so another jurisdiction's figures can be loaded
//! from CSV without touching the calculators.

/// Annuity present-value factor by claim age
///
/// The factor is the expected number of discounted remaining life-years at the
/// claim age. A lump sum divided by the factor (and by 12) gives the level
/// monthly annuity the account can pay.
#[derive(Debug, Clone)]
pub struct AnnuityTable {
    /// (age, factor) pairs sorted by age
    points: Vec<(f64, f64)>,

    /// Publication date of the source figures, shown alongside results
    publish_date: Option<String>,
}

impl AnnuityTable {
    /// Build a table from (age, factor) pairs in any order
    pub fn new(mut points: Vec<(f64, f64)>, publish_date: Option<String>) -> Self {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.dedup_by(|a, b| a.0 == b.0);
        Self { points, publish_date }
    }

    /// Labor pension annuity factors at five-year claim ages
    pub fn taiwan_labor_pension() -> Self {
        Self::new(
            vec![
                (50.0, 26.93),
                (55.0, 24.06),
                (60.0, 20.67),
                (65.0, 17.72),
                (70.0, 14.72),
                (75.0, 11.92),
                (80.0, 9.37),
            ],
            Some("2024-01".to_string()),
        )
    }

    /// Annuity factor for a claim age
    ///
    /// Exact keys are returned as-is, ages outside the table clamp to the nearest
    /// boundary, anything in between is linearly interpolated.
    pub fn factor(&self, age: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };

        if age <= first.0 {
            return first.1;
        }
        if age >= last.0 {
            return last.1;
        }

        for window in self.points.windows(2) {
            let (age1, f1) = window[0];
            let (age2, f2) = window[1];
            if age == age1 {
                return f1;
            }
            if age > age1 && age < age2 {
                return f1 + (f2 - f1) * (age - age1) / (age2 - age1);
            }
        }

        last.1
    }

    /// Level monthly payment bought by `lump_sum` at `age`
    pub fn monthly_annuity(&self, lump_sum: f64, age: f64) -> f64 {
        let factor = self.factor(age);
        if factor <= 0.0 {
            return 0.0;
        }
        lump_sum / factor / 12.0
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn publish_date(&self) -> Option<&str> {
        self.publish_date.as_deref()
    }
}

/// Legal retirement age by birth cohort
#[derive(Debug, Clone)]
pub struct RetirementAgeSchedule {
    /// (latest birth year, legal age) sorted by birth year
    steps: Vec<(i32, u32)>,

    /// Legal age for every cohort born after the last step
    ultimate_age: u32,
}

impl RetirementAgeSchedule {
    pub fn new(mut steps: Vec<(i32, u32)>, ultimate_age: u32) -> Self {
        steps.sort_by_key(|(year, _)| *year);
        Self { steps, ultimate_age }
    }

    /// Labor insurance ramp: 60 for 1956 and earlier, one year per cohort to 65 from 1961
    pub fn taiwan_labor_insurance() -> Self {
        Self::new(
            vec![(1956, 60), (1957, 61), (1958, 62), (1959, 63), (1960, 64)],
            65,
        )
    }

    pub fn legal_age(&self, birth_year: i32) -> u32 {
        self.steps
            .iter()
            .find(|(latest_year, _)| birth_year <= *latest_year)
            .map(|(_, age)| *age)
            .unwrap_or(self.ultimate_age)
    }

    pub fn ultimate_age(&self) -> u32 {
        self.ultimate_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_exact_lookup() {
        let table = AnnuityTable::taiwan_labor_pension();
        assert_eq!(table.factor(60.0), 20.67);
        assert_eq!(table.factor(65.0), 17.72);
    }

    #[test]
    fn test_interpolation() {
        let table = AnnuityTable::taiwan_labor_pension();
        // 60 -> 20.67, 65 -> 17.72; 62 is 2/5 of the way
        assert_abs_diff_eq!(table.factor(62.0), 19.49, epsilon = 1e-9);
    }

    #[test]
    fn test_clamps_at_edges() {
        let table = AnnuityTable::taiwan_labor_pension();
        assert_eq!(table.factor(45.0), 26.93);
        assert_eq!(table.factor(90.0), 9.37);
    }

    #[test]
    fn test_interpolation_stays_between_keys() {
        let table = AnnuityTable::taiwan_labor_pension();
        for window in table.points().windows(2) {
            let (a1, f1) = window[0];
            let (a2, f2) = window[1];
            let (lo, hi) = if f1 < f2 { (f1, f2) } else { (f2, f1) };
            let mut age = a1 + 0.25;
            while age < a2 {
                let f = table.factor(age);
                assert!(f >= lo && f <= hi, "factor {} at age {} outside [{}, {}]", f, age, lo, hi);
                age += 0.25;
            }
        }
    }

    #[test]
    fn test_empty_table() {
        let table = AnnuityTable::new(Vec::new(), None);
        assert_eq!(table.factor(60.0), 0.0);
        assert_eq!(table.monthly_annuity(1_000_000.0, 60.0), 0.0);
    }

    #[test]
    fn test_monthly_annuity() {
        let table = AnnuityTable::taiwan_labor_pension();
        assert_abs_diff_eq!(
            table.monthly_annuity(2_067_000.0, 60.0),
            2_067_000.0 / 20.67 / 12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_legal_age_ramp() {
        let schedule = RetirementAgeSchedule::taiwan_labor_insurance();
        assert_eq!(schedule.legal_age(1940), 60);
        assert_eq!(schedule.legal_age(1956), 60);
        assert_eq!(schedule.legal_age(1957), 61);
        assert_eq!(schedule.legal_age(1958), 62);
        assert_eq!(schedule.legal_age(1959), 63);
        assert_eq!(schedule.legal_age(1960), 64);
        assert_eq!(schedule.legal_age(1961), 65);
        assert_eq!(schedule.legal_age(1990), 65);
    }

    #[test]
    fn test_legal_age_non_decreasing() {
        let schedule = RetirementAgeSchedule::taiwan_labor_insurance();
        let mut previous = 0;
        for year in 1930..2010 {
            let age = schedule.legal_age(year);
            assert!(age >= previous, "legal age dropped at birth year {}", year);
            previous = age;
        }
    }
}
