//! The quantified properties of the matcher, checked on concrete
//! families of inputs.

use ast::{Exp, Sym, encode};
use matching::{Constraint, MatchOpts, Problem, Solution};
use printer::PrintToString;

fn app(children: Vec<Exp>) -> Exp {
    Exp::app(children)
}

fn constrain(pattern: &Exp, expression: &Exp) -> Constraint {
    Constraint::new(pattern, expression).unwrap()
}

fn all_solutions(constraints: Vec<Constraint>) -> Vec<Solution> {
    Problem::new(constraints)
        .solutions(MatchOpts::default())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn solutions_preserve_their_constraints() {
    // Every solution, applied to the pattern, reproduces the expression
    // up to α-equivalence.
    let cases = vec![
        (
            app(vec![Exp::sym("+"), Exp::metavar("A"), Exp::metavar("B")]),
            app(vec![Exp::sym("+"), Exp::sym("u"), Exp::sym("v")]),
        ),
        (
            Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]),
            app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]),
        ),
        (
            Exp::bind(Sym::new("∀"), &["x"], Exp::efa(Exp::metavar("F"), vec![Exp::sym("x")])),
            Exp::bind(Sym::new("∀"), &["z"], app(vec![Exp::sym("P"), Exp::sym("z")])),
        ),
    ];
    for (pattern, expression) in cases {
        let encoded_pattern = encode(&pattern).unwrap();
        let encoded_expression = encode(&expression).unwrap();
        let solutions = all_solutions(vec![constrain(&pattern, &expression)]);
        assert!(!solutions.is_empty());
        for solution in solutions {
            assert_eq!(solution.apply(&encoded_pattern), encoded_expression);
        }
    }
}

#[test]
fn capture_is_rejected() {
    // (∀ x . M) against (∀ x . x): the only candidate instantiation
    // would capture the bound variable, so there is no solution.
    let pattern = Exp::bind(Sym::new("∀"), &["x"], Exp::metavar("M"));
    let expression = Exp::bind(Sym::new("∀"), &["x"], Exp::sym("x"));
    assert!(all_solutions(vec![constrain(&pattern, &expression)]).is_empty());

    // A closed instantiation under the same binder is fine.
    let pattern = Exp::bind(Sym::new("∀"), &["x"], app(vec![Exp::sym("Q"), Exp::metavar("M")]));
    let expression = Exp::bind(Sym::new("∀"), &["x"], app(vec![Exp::sym("Q"), Exp::sym("c")]));
    let solutions = all_solutions(vec![constrain(&pattern, &expression)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("M").unwrap().expression(), &Exp::sym("c"));
}

#[test]
fn the_stream_is_deterministic() {
    let constraints = || {
        vec![constrain(
            &Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]),
            &app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]),
        )]
    };
    let first = all_solutions(constraints());
    let second = all_solutions(constraints());
    assert_eq!(first, second);
}

#[test]
fn applying_a_solution_is_idempotent() {
    let pattern = app(vec![Exp::sym("+"), Exp::metavar("A"), Exp::metavar("B")]);
    let expression = app(vec![
        Exp::sym("+"),
        app(vec![Exp::sym("*"), Exp::sym("3"), Exp::sym("x")]),
        Exp::sym("y"),
    ]);
    let solutions = all_solutions(vec![constrain(&pattern, &expression)]);
    let once = solutions[0].apply(&pattern);
    assert_eq!(solutions[0].apply(&once), once);
}

#[test]
fn max_solutions_cuts_the_stream() {
    let constraint = constrain(
        &Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]),
        &app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]),
    );
    let opts = MatchOpts { max_solutions: Some(2), ..Default::default() };
    let mut stream = Problem::new(vec![constraint]).solutions(opts);
    assert!(stream.next().is_some());
    assert!(stream.next().is_some());
    assert!(stream.next().is_none());
}

#[test]
fn direct_mode_skips_constant_instantiations() {
    // (@ F y) against y: without the constant branch only the
    // projection remains.
    let constraint = constrain(&Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]), &Exp::sym("y"));
    let opts = MatchOpts { direct: true, ..Default::default() };
    let solutions = Problem::new(vec![constraint])
        .solutions(opts)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(solutions.len(), 1);
    let found = solutions[0].get("F").unwrap().expression().print_to_string(None);
    assert_eq!(found, "(λ x1 . @0.0)");

    // An EFA that only the constant branch could close yields nothing.
    let constraint = constrain(
        &Exp::efa(Exp::metavar("F"), vec![Exp::sym("c")]),
        &app(vec![Exp::sym("g"), Exp::sym("y")]),
    );
    let opts = MatchOpts { direct: true, ..Default::default() };
    assert!(Problem::new(vec![constraint]).first_solution(opts).unwrap().is_none());
}

#[test]
fn exhaustion_is_a_value_not_an_error() {
    let constraint = constrain(&Exp::sym("a"), &Exp::sym("b"));
    let result = Problem::new(vec![constraint]).first_solution(MatchOpts::default());
    assert_eq!(result, Ok(None));
}

#[test]
fn canonical_textual_form() {
    // The stable debug representation: metavariables carry a trailing
    // `__`, the EFA head prints as `@`, the binder head as `λ`.
    let constraint = constrain(
        &Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]),
        &app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]),
    );
    assert_eq!(constraint.print_to_string(None), "((@ F__ y), (g y y))");

    let binder = Exp::bind(Sym::new("∀"), &["x"], app(vec![Exp::sym("P"), Exp::sym("x")]));
    assert_eq!(binder.print_to_string(None), "(∀ x . (P x))");

    let solutions = all_solutions(vec![constrain(
        &Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]),
        &Exp::sym("y"),
    )]);
    assert_eq!(solutions[0].print_to_string(None), "{F__ := (λ x1 . y)}");
}
