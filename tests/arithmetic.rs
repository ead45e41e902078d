use brisk::Value;

mod cases;

test_case! {
    name: number_literal,
    input: "42",
    result: { Ok(Value::from(42)) },
}

test_case! {
    name: decimal_literal,
    input: "  3.25  ",
    result: { Ok(Value::from(3.25)) },
}

test_case! {
    name: multiplication_binds_tighter,
    input: "1 + 2 * 3",
    result: { Ok(Value::from(7)) },
}

test_case! {
    name: parentheses_override_precedence,
    input: "(1 + 2) * 3",
    result: { Ok(Value::from(9)) },
}

test_case! {
    name: subtraction_is_left_associative,
    input: "10 - 4 - 3",
    result: { Ok(Value::from(3)) },
}

test_case! {
    name: division_is_left_associative,
    input: "64 / 4 / 2",
    result: { Ok(Value::from(8)) },
}

test_case! {
    name: remainder,
    input: "17 % 5",
    result: { Ok(Value::from(2)) },
}

test_case! {
    name: division_yields_fractions,
    input: "7 / 2",
    result: { Ok(Value::from(3.5)) },
}

test_case! {
    name: negation,
    input: "-5 + 2",
    result: { Ok(Value::from(-3)) },
}

test_case! {
    name: negation_binds_its_operand,
    input: "-2 * 3",
    result: { Ok(Value::from(-6)) },
}

test_case! {
    name: negated_group,
    input: "-(1 + 2)",
    result: { Ok(Value::from(-3)) },
}

test_case! {
    name: operator_followed_by_negation,
    input: "10 * -2",
    result: { Ok(Value::from(-20)) },
}

test_case! {
    name: variables,
    input: "price * qty",
    vars: { "price" => 2.5, "qty" => 4 },
    result: { Ok(Value::from(10)) },
}

test_case! {
    name: pricing_formula,
    input: "round(base * (1 + markup / 100) - discount)",
    vars: { "base" => 80, "markup" => 25, "discount" => 0.4 },
    result: { Ok(Value::from(100)) },
}

test_case! {
    name: division_by_zero,
    input: "1 / (2 - 2)",
    message: { "evaluation error: operator '/': division by zero" },
}

test_case! {
    name: remainder_by_zero,
    input: "5 % 0",
    message: { "evaluation error: operator '%': division by zero" },
}

test_case! {
    name: arithmetic_on_bool,
    input: "flag * 2",
    vars: { "flag" => true },
    message: { "evaluation error: operator '*': type mismatch: expected number, found bool" },
}
