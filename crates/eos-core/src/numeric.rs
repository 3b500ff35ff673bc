use crate::error::CoreError;

/// Median of a scratch buffer, sorting it as a side effect.
///
/// Odd lengths take the middle sorted element; even lengths average the
/// two central sorted elements. Empty input is rejected.
pub fn median_in_place(values: &mut [f64]) -> Result<f64, CoreError> {
    if values.is_empty() {
        return Err(CoreError::InvalidArg {
            what: "median of empty slice",
        });
    }
    values.sort_unstable_by(f64::total_cmp);

    let n = values.len();
    if n % 2 != 0 {
        Ok(values[n / 2])
    } else {
        Ok(0.5 * (values[(n - 1) / 2] + values[n / 2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn median_odd_takes_middle_element() {
        let mut window = [3.0, 1.0, 7.0, 5.0, 2.0, 6.0, 4.0];
        assert_eq!(median_in_place(&mut window).unwrap(), 4.0);
    }

    #[test]
    fn median_even_averages_central_pair() {
        let mut window = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median_in_place(&mut window).unwrap(), 2.5);
    }

    #[test]
    fn median_single_element() {
        let mut window = [9.5];
        assert_eq!(median_in_place(&mut window).unwrap(), 9.5);
    }

    #[test]
    fn median_empty_is_an_error() {
        let mut window: [f64; 0] = [];
        assert!(median_in_place(&mut window).is_err());
    }

    proptest! {
        #[test]
        fn median_matches_sort_oracle(mut values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
            let mut sorted = values.clone();
            sorted.sort_unstable_by(f64::total_cmp);
            let n = sorted.len();
            let expected = if n % 2 != 0 {
                sorted[n / 2]
            } else {
                0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
            };
            let got = median_in_place(&mut values).unwrap();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn median_lies_within_input_range(mut values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let m = median_in_place(&mut values).unwrap();
            prop_assert!(m >= lo && m <= hi);
        }
    }
}
