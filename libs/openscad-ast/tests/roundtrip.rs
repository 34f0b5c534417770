use openscad_ast::parse;

/// Parsing the same source twice must yield structurally identical ASTs —
/// the determinism property §8 relies on for stable cache fingerprints.
#[test]
fn roundtrip_basic() {
    let src = "a = 1; translate([1,2,3]) cube(1);";
    let ast1 = parse(src).unwrap();
    let ast2 = parse(src).unwrap();
    assert_eq!(ast1.statements.len(), 2);
    assert_eq!(format!("{:?}", ast1.statements), format!("{:?}", ast2.statements));
}
