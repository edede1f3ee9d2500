use std::cmp::Ordering;

use rstest::rstest;

use undine::specificity::{calculate, compare, SpecificityScore};

#[test]
fn test_tiers_order_as_expected() {
    let element = calculate("div");
    let class = calculate(".card");
    let id = calculate("#main");

    assert_eq!(element.total, 1);
    assert_eq!(class.total, 10);
    assert_eq!(id.total, 100);
    assert_eq!(compare(&element, &class), Ordering::Less);
    assert_eq!(compare(&class, &id), Ordering::Less);
}

#[rstest]
#[case("div.card", 11)]
#[case("#main .nav a", 111)]
#[case("ul li a", 3)]
#[case("a:hover", 11)]
#[case("li:nth-child(2)", 11)]
#[case("p::before", 2)]
// Legacy single-colon spelling still counts as a pseudo-element
#[case("p:before", 2)]
fn test_selector_totals(#[case] selector: &str, #[case] expected_total: u32) {
    assert_eq!(calculate(selector).total, expected_total);
}

#[test]
fn test_one_id_outweighs_many_classes() {
    let id = calculate("#main");
    let classes = calculate(".a.b.c.d");

    assert_eq!(classes.total, 40);
    assert_eq!(compare(&classes, &id), Ordering::Less);
}

#[test]
fn test_attribute_selectors_count_as_classes() {
    let score = calculate("input[type=\"checkbox\"]");

    assert_eq!(score.classes, 1);
    assert_eq!(score.elements, 1);
    assert_eq!(score.total, 11);
}

#[test]
fn test_functional_pseudo_class_arguments() {
    // :where contributes nothing, :not and :is take their strongest argument
    assert_eq!(calculate(":where(#a, .b)").total, 0);
    assert_eq!(calculate(":not(.a)").total, 10);
    assert_eq!(calculate("div:is(.a, #b)").total, 101);
}

#[test]
fn test_selector_list_takes_the_strongest_alternative() {
    let list = calculate("div, #main, .card");

    assert_eq!(list.total, calculate("#main").total);
    assert_eq!(list.ids, 1);
}

#[test]
fn test_universal_selector_and_combinators_are_free() {
    assert_eq!(calculate("*").total, 0);
    assert_eq!(calculate("div > p + span ~ a").total, 4);
}

#[test]
fn test_non_selector_preludes_still_get_a_score() {
    // Keyframe steps are not selectors; the coarse fallback covers them
    let score = calculate("0%");

    assert_eq!(score.total, 1);
    assert_eq!(score.elements, 1);
}

#[test]
fn test_equal_totals_compare_equal_across_breakdowns() {
    let classes = calculate(".a.b");
    let attributes = calculate("[a][b]");

    assert_eq!(classes.total, 20);
    assert_eq!(attributes.total, 20);
    assert_eq!(compare(&classes, &attributes), Ordering::Equal);
}

#[test]
fn test_scores_are_stable_for_the_same_selector() {
    let first = calculate("#main .nav a:hover");
    let second = calculate("#main .nav a:hover");

    assert_eq!(first, second);
    assert_eq!(first.total, 121);
}

#[test]
fn test_scores_serialize_with_their_breakdown() {
    let score = calculate("#a .b span");
    let json = serde_json::to_value(score).expect("serializes");

    assert_eq!(json["total"], 110);
    assert_eq!(json["ids"], 1);
    assert_eq!(json["classes"], 1);
    assert_eq!(json["elements"], 1);
}

#[test]
fn test_from_parts_computes_the_weighted_total() {
    let score = SpecificityScore::from_parts(2, 1, 1, 3);

    assert_eq!(score.total, 223);
    assert_eq!(score.ids, 2);
    assert_eq!(score.pseudo_classes, 1);
}
