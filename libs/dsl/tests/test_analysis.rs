//! End-to-end analysis tests: expression text in, units or diagnostic out.

use nimbus_dsl::{Error, InMemoryRegistry, SemanticKind, Units};

fn registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
        .with_series("Observed Rainfall", Units::base("mm"))
        .with_series("Gridded Rainfall", Units::base("mm"))
        .with_series("Observed Max Temp", Units::base("Kelvin"))
}

fn units_of(expression: &str) -> Result<Units, Error> {
    let expr = nimbus_dsl::parse(expression)?;
    nimbus_dsl::units(&expr, &registry())
}

fn expect_units(expression: &str, expected: &str) {
    assert_eq!(
        units_of(expression).unwrap(),
        Units::parsed_from(expected).unwrap(),
        "units of {expression}"
    );
}

#[test]
fn subtracting_an_absolute_amount_yields_a_delta() {
    expect_units(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1,1)) - 2 mm"#,
        "delta mm",
    );
}

#[test]
fn subtracting_a_delta_yields_an_absolute_amount() {
    expect_units(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1,1)) - 2 delta mm"#,
        "mm",
    );
}

#[test]
fn squaring_an_average_squares_its_units() {
    expect_units(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1,1)) ** 2"#,
        "mm^2",
    );
}

#[test]
fn dividing_two_averages_is_dimensionless() {
    expect_units(
        r#"
            Average(
                "Gridded Rainfall",
                FromDate(1980, 1, 1),
                ToDate(2000, 12, 31),
                Months(Jul, Aug, Sep, Oct, Nov, December, Jan, Feb, Mar, April)
            )
            /
            Average(
                "Gridded Rainfall",
                FromDate(1990, 1, 1),
                ToDate(2010, 12, 31)
            )
        "#,
        "",
    );
}

#[test]
fn subtracting_two_averages_yields_a_delta() {
    expect_units(
        r#"
            Average(
                "Gridded Rainfall",
                FromDate(1980, 1, 1),
                ToDate(2000, 12, 31),
                Months(Jul, Aug, Sep, Oct, Nov, December, Jan, Feb, Mar, April)
            )
            -
            Average(
                "Gridded Rainfall",
                FromDate(1990, 1, 1),
                ToDate(2010, 12, 31)
            )
        "#,
        "delta mm",
    );
}

#[test]
fn maximum_resolves_to_the_series_units() {
    expect_units(
        r#"
        Maximum(
            "Observed Max Temp",
            FromDate(1950, Jan),
            ToDate(2011, Jul)
        )
        "#,
        "Kelvin",
    );
}

#[test]
fn out_of_range_year_renders_the_annotated_tree() {
    let err = units_of(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1, 1,1)) - 2"#,
    )
    .unwrap_err();
    let expected = r#"(
    Average(
        "Observed Rainfall",
        FromDate(1960, 1, 1)
        ToDate(1, 1, 1)
        # ^ Year should be in range 1900 to 2500
    )
    -
    2.0
)"#;
    assert!(matches!(
        err,
        Error::Semantic {
            kind: SemanticKind::DateRange,
            ..
        }
    ));
    assert_eq!(err.to_string(), expected);
}

#[test]
fn unknown_series_is_reported_at_the_call() {
    let err = units_of(
        r#"Average("No Such Series", FromDate(1960, 1, 1), ToDate(1961, 1, 1))"#,
    )
    .unwrap_err();
    let Error::Semantic { kind, rendered } = err else {
        panic!("expected a semantic error");
    };
    assert_eq!(kind, SemanticKind::UnknownSeries);
    assert!(rendered.contains(r#"# ^ unknown series "No Such Series""#));
}

#[test]
fn adding_mismatched_dimensions_is_reported_at_the_operator() {
    let err = units_of(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1, 1)) + 2 Kelvin"#,
    )
    .unwrap_err();
    let Error::Semantic { kind, rendered } = err else {
        panic!("expected a semantic error");
    };
    assert_eq!(kind, SemanticKind::DimensionMismatch);
    assert!(rendered.contains("# ^ incompatible dimensions: 'mm' vs 'Kelvin'"));
}

#[test]
fn unrecognized_month_is_reported_at_its_argument() {
    let err = units_of(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1, 1), Months(Jan, Foo))"#,
    )
    .unwrap_err();
    let Error::Semantic { kind, rendered } = err else {
        panic!("expected a semantic error");
    };
    assert_eq!(kind, SemanticKind::InvalidMonth);
    assert!(rendered.contains(r#"# ^ Unrecognized month "Foo""#));
}

#[test]
fn exponent_must_be_a_plain_literal() {
    let err = units_of(
        r#"Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1, 1)) ** 2 mm"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Semantic {
            kind: SemanticKind::InvalidExponent,
            ..
        }
    ));
}

#[test]
fn square_root_of_a_squared_average() {
    expect_units(
        r#"(Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1, 1)) ** 2) ** 0.5"#,
        "mm",
    );
}

#[test]
fn first_error_in_traversal_order_wins() {
    // Both the FromDate year and the series name are bad; the date argument
    // is analyzed first.
    let err = units_of(
        r#"Average("No Such Series", FromDate(1, 1, 1), ToDate(1961, 1, 1))"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Semantic {
            kind: SemanticKind::DateRange,
            ..
        }
    ));
}
