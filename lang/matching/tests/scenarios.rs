//! End-to-end matching scenarios, driven through the public interface.

use ast::{Exp, Idx, Lam, Sym, Var};
use matching::{Constraint, MatchOpts, Problem, Solution};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn app(children: Vec<Exp>) -> Exp {
    Exp::app(children)
}

fn constrain(pattern: Exp, expression: Exp) -> Constraint {
    Constraint::new(&pattern, &expression).unwrap()
}

fn all_solutions(constraints: Vec<Constraint>) -> Vec<Solution> {
    Problem::new(constraints)
        .solutions(MatchOpts::default())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// `3 - t` as a tree.
fn three_minus_t() -> Exp {
    app(vec![Exp::sym("-"), Exp::sym("3"), Exp::sym("t")])
}

#[test]
fn trivial_success_yields_the_empty_solution() {
    init();
    let solutions = all_solutions(vec![constrain(three_minus_t(), three_minus_t())]);
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_empty());
}

#[test]
fn alpha_equivalent_sides_match_without_substitutions() {
    init();
    let p = Exp::bind(Sym::new("∀"), &["x"], app(vec![Exp::sym("P"), Exp::sym("x")]));
    let e = Exp::bind(Sym::new("∀"), &["y"], app(vec![Exp::sym("P"), Exp::sym("y")]));
    let solutions = all_solutions(vec![constrain(p, e)]);
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_empty());
}

#[test]
fn simple_instantiation() {
    init();
    // (A + B) against (3x + y²).
    let pattern = app(vec![Exp::sym("+"), Exp::metavar("A"), Exp::metavar("B")]);
    let three_x = app(vec![Exp::sym("*"), Exp::sym("3"), Exp::sym("x")]);
    let y_squared = app(vec![Exp::sym("^"), Exp::sym("y"), Exp::sym("2")]);
    let expression = app(vec![Exp::sym("+"), three_x.clone(), y_squared.clone()]);

    let solutions = all_solutions(vec![constrain(pattern, expression)]);
    assert_eq!(solutions.len(), 1);
    let assignments = solutions[0].assignments();
    assert_eq!(assignments["A"], three_x);
    assert_eq!(assignments["B"], y_squared);
}

#[test]
fn head_mismatch_yields_nothing() {
    init();
    let forall = Exp::bind(Sym::new("∀"), &["x"], app(vec![Exp::sym("P"), Exp::sym("x")]));
    let solutions = all_solutions(vec![constrain(Exp::sym("3"), forall)]);
    assert!(solutions.is_empty());
}

#[test]
fn children_of_rigid_patterns_must_agree() {
    init();
    let pattern = app(vec![Exp::sym("a"), Exp::sym("b"), Exp::sym("c")]);
    let expression = app(vec![Exp::sym("w"), Exp::sym("x"), Exp::sym("y")]);
    let solutions = all_solutions(vec![constrain(pattern, expression)]);
    assert!(solutions.is_empty());
}

#[test]
fn children_of_flexible_patterns_instantiate_in_order() {
    init();
    let pattern = app(vec![Exp::metavar("A"), Exp::metavar("B"), Exp::metavar("C")]);
    let expression = app(vec![Exp::sym("w"), Exp::sym("x"), Exp::sym("y")]);
    let solutions = all_solutions(vec![constrain(pattern, expression)]);
    assert_eq!(solutions.len(), 1);
    let assignments = solutions[0].assignments();
    assert_eq!(assignments["A"], Exp::sym("w"));
    assert_eq!(assignments["B"], Exp::sym("x"));
    assert_eq!(assignments["C"], Exp::sym("y"));
}

#[test]
fn efa_projection_and_constant() {
    init();
    // (@ F y) against y.
    let pattern = Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]);
    let solutions = all_solutions(vec![constrain(pattern, Exp::sym("y"))]);

    let constant = Exp::Lam(Lam::abstraction(1, Exp::sym("y")));
    let project = Exp::Lam(Lam::abstraction(1, Exp::Var(Var::new(Idx { fst: 0, snd: 0 }))));
    let found: Vec<&Exp> =
        solutions.iter().map(|s| s.get("F").unwrap().expression()).collect();
    assert_eq!(found, vec![&constant, &project]);
}

#[test]
fn efa_imitation_closes_duplicated_arguments() {
    init();
    // (@ F y) against (g y y).
    let pattern = Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]);
    let expression = app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]);
    let solutions = all_solutions(vec![constrain(pattern, expression)]);

    let x = || Exp::Var(Var::new(Idx { fst: 0, snd: 0 }));
    let g_yy = Exp::Lam(Lam::abstraction(1, app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")])));
    let g_xx = Exp::Lam(Lam::abstraction(1, app(vec![Exp::sym("g"), x(), x()])));

    // Constant first, then the imitation grid over the two fresh EFAs.
    assert_eq!(solutions.len(), 5);
    assert_eq!(solutions[0].get("F").unwrap().expression(), &g_yy);
    assert_eq!(solutions[4].get("F").unwrap().expression(), &g_xx);
    // Fresh imitation metavariables never leak into solutions.
    for solution in &solutions {
        assert_eq!(solution.len(), 1);
    }
}

#[test]
fn efa_under_a_binder_imitates_on_indices() {
    init();
    // (∀ x . (@ F x)) against (∀ x . (P x)): the only solution takes the
    // argument through the imitated head.
    let pattern = Exp::bind(
        Sym::new("∀"),
        &["x"],
        Exp::efa(Exp::metavar("F"), vec![Exp::sym("x")]),
    );
    let expression =
        Exp::bind(Sym::new("∀"), &["x"], app(vec![Exp::sym("P"), Exp::sym("x")]));
    let solutions = all_solutions(vec![constrain(pattern, expression)]);

    let p_of_arg = Exp::Lam(Lam::abstraction(
        1,
        app(vec![Exp::sym("P"), Exp::Var(Var::new(Idx { fst: 0, snd: 0 }))]),
    ));
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("F").unwrap().expression(), &p_of_arg);
}

#[test]
fn efa_with_metavariable_arguments() {
    init();
    // (@ F A) against c: the projection branch stays open because the
    // argument's occurrences cannot be counted yet.
    let pattern = Exp::efa(Exp::metavar("F"), vec![Exp::metavar("A")]);
    let solutions = all_solutions(vec![constrain(pattern, Exp::sym("c"))]);

    let constant = Exp::Lam(Lam::abstraction(1, Exp::sym("c")));
    let project = Exp::Lam(Lam::abstraction(1, Exp::Var(Var::new(Idx { fst: 0, snd: 0 }))));
    assert_eq!(solutions.len(), 2);
    // The constant instantiation leaves A unconstrained.
    assert_eq!(solutions[0].get("F").unwrap().expression(), &constant);
    assert!(solutions[0].get("A").is_none());
    // The projection forces A to the expression.
    assert_eq!(solutions[1].get("F").unwrap().expression(), &project);
    assert_eq!(solutions[1].get("A").unwrap().expression(), &Exp::sym("c"));
}
