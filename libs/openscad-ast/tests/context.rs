use openscad_ast::ast::Statement;
use openscad_ast::parse;

/// Special variables parse as ordinary assignments whose name starts with
/// `$`; the evaluator's `Scope` (openscad-eval) is what seeds their
/// defaults and threads them through nested contexts, not the AST.
#[test]
fn special_variable_assignments_parse_as_dollar_names() {
    let src = "$fn = 32; $fa = 12; $fs = 0.5; $t = 0; $preview = true; $children = 1;";
    let ast = parse(src).unwrap();
    assert_eq!(ast.statements.len(), 6);
    for stmt in &ast.statements {
        match stmt {
            Statement::Assignment { name, .. } => assert!(name.starts_with('$')),
            other => panic!("expected assignment, got {other:?}"),
        }
    }
}
