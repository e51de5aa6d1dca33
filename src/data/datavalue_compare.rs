use crate::data::datatable::DataValue;
use std::cmp::Ordering;

/// Rank used when two values are of different kinds.
/// Order: Null < Boolean < number < String
fn kind_rank(value: &DataValue) -> u8 {
    match value {
        DataValue::Null => 0,
        DataValue::Boolean(_) => 1,
        DataValue::Integer(_) | DataValue::Float(_) => 2,
        DataValue::String(_) => 3,
    }
}

/// 2^63 as f64; every float below this and at or above its negation truncates
/// into an i64 exactly
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact integer/float comparison. Converting the integer to f64 loses precision
/// above 2^53 and breaks transitivity, so the float is split instead.
/// NaN sorts after every number.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() || f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        other => other,
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

/// Compare two DataValues for sorting.
/// Numbers compare by value regardless of integer/float storage.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::Float(a), DataValue::Float(b)) => compare_floats(*a, *b),
        (DataValue::Integer(i), DataValue::Float(f)) => compare_int_float(*i, *f),
        (DataValue::Float(f), DataValue::Integer(i)) => compare_int_float(*i, *f).reverse(),
        (DataValue::String(a), DataValue::String(b)) => a.cmp(b),
        (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),
        (DataValue::Null, DataValue::Null) => Ordering::Equal,
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Compare optional values; a missing key sorts like Null
pub fn compare_optional_datavalues(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(b)) => compare_datavalues(&DataValue::Null, b),
        (Some(a), None) => compare_datavalues(a, &DataValue::Null),
        (Some(a), Some(b)) => compare_datavalues(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_comparison() {
        assert_eq!(
            compare_datavalues(&DataValue::Integer(1), &DataValue::Integer(2)),
            Ordering::Less
        );
        assert_eq!(
            compare_datavalues(&DataValue::Integer(3), &DataValue::Integer(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(
            compare_datavalues(&DataValue::Integer(2), &DataValue::Float(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_datavalues(&DataValue::Float(2.0), &DataValue::Integer(2)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_mixed_numeric_above_f64_precision() {
        let big = 1i64 << 53;
        let above = DataValue::Integer(big + 1);
        let float = DataValue::Float(big as f64);
        let exact = DataValue::Integer(big);

        assert_eq!(compare_datavalues(&above, &float), Ordering::Greater);
        assert_eq!(compare_datavalues(&float, &above), Ordering::Less);
        assert_eq!(compare_datavalues(&float, &exact), Ordering::Equal);
        assert_eq!(compare_datavalues(&above, &exact), Ordering::Greater);
    }

    #[test]
    fn test_fraction_breaks_integer_ties() {
        assert_eq!(
            compare_datavalues(&DataValue::Integer(2), &DataValue::Float(2.5)),
            Ordering::Less
        );
        assert_eq!(
            compare_datavalues(&DataValue::Integer(-2), &DataValue::Float(-2.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_datavalues(&DataValue::Float(-0.5), &DataValue::Integer(0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_out_of_range_and_nan_floats() {
        let max = DataValue::Integer(i64::MAX);
        let min = DataValue::Integer(i64::MIN);
        assert_eq!(compare_datavalues(&max, &DataValue::Float(1e19)), Ordering::Less);
        assert_eq!(compare_datavalues(&min, &DataValue::Float(-1e19)), Ordering::Greater);
        assert_eq!(compare_datavalues(&max, &DataValue::Float(f64::NAN)), Ordering::Less);
        assert_eq!(
            compare_datavalues(&DataValue::Float(f64::NAN), &DataValue::Float(f64::INFINITY)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_string_comparison() {
        assert_eq!(
            compare_datavalues(&DataValue::from("Ohio"), &DataValue::from("Texas")),
            Ordering::Less
        );
    }

    #[test]
    fn test_missing_sorts_first() {
        let one = DataValue::Integer(1);
        assert_eq!(compare_optional_datavalues(None, Some(&one)), Ordering::Less);
        assert_eq!(compare_optional_datavalues(Some(&one), None), Ordering::Greater);
        assert_eq!(
            compare_optional_datavalues(None, Some(&DataValue::Null)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_cross_type_comparison() {
        assert_eq!(
            compare_datavalues(&DataValue::Boolean(true), &DataValue::Integer(0)),
            Ordering::Less
        );
        assert_eq!(
            compare_datavalues(&DataValue::Float(9.0), &DataValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            compare_datavalues(&DataValue::from("a"), &DataValue::Null),
            Ordering::Greater
        );
    }
}
