use openscad_ast::ast::{Argument, Expression};
use openscad_ast::parse;
use openscad_ast::Statement;

/// `multmatrix()` never raises a semantic error for a malformed matrix
/// shape — evaluation is total per the language's own design, so a
/// too-short row list just leaves the unset rows at their identity
/// default. This only checks that parsing hands the evaluator the
/// argument untouched; `eval_multmatrix` is what applies the fallback.
#[test]
fn multmatrix_with_short_rows_parses_without_error() {
    let src = "multmatrix([[1,0],[0,1]]) cube(1);";
    let ast = parse(src).unwrap();
    assert_eq!(ast.statements.len(), 1);
    match &ast.statements[0] {
        Statement::ModuleCall { name, args, .. } => {
            assert_eq!(name, "multmatrix");
            match &args[0] {
                Argument::Positional(Expression::List(rows)) => assert_eq!(rows.len(), 2),
                other => panic!("expected a list argument, got {other:?}"),
            }
        }
        other => panic!("expected module call, got {other:?}"),
    }
}
