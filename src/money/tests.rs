use super::*;

#[test]
fn order_total_sums_lines_exactly() {
    // 2 x 15.50 + 1 x 9.00 = 40.00
    assert_eq!(order_total(&[(2, 15.50), (1, 9.00)]), 40.00);
}

#[test]
fn order_total_of_no_lines_is_zero() {
    assert_eq!(order_total(&[]), 0.0);
}

#[test]
fn float_artifacts_do_not_accumulate() {
    // 0.1 + 0.2 style drift must not survive the Decimal round-trip
    let lines: Vec<(i64, f64)> = (0..10).map(|_| (1, 0.10)).collect();
    assert_eq!(order_total(&lines), 1.00);

    assert_eq!(order_total(&[(3, 19.99)]), 59.97);
}

#[test]
fn rounding_is_midpoint_away_from_zero() {
    assert_eq!(to_f64(to_decimal(2.005)), 2.01);
    assert_eq!(to_f64(to_decimal(2.004)), 2.00);
}

#[test]
fn non_finite_input_becomes_zero() {
    assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
}

#[test]
fn price_validation_bounds() {
    assert!(validate_unit_price(15.50).is_ok());
    assert!(validate_unit_price(0.0).is_ok());
    assert!(validate_unit_price(-1.0).is_err());
    assert!(validate_unit_price(f64::NAN).is_err());
    assert!(validate_unit_price(2_000_000.0).is_err());
}

#[test]
fn quantity_validation_bounds() {
    assert!(validate_quantity(1).is_ok());
    assert!(validate_quantity(0).is_err());
    assert!(validate_quantity(-2).is_err());
    assert!(validate_quantity(10_000).is_err());
}
