use std::cell::Cell;
use std::rc::Rc;

use ferb_lang_interpreter::object::{EvaluationError, Value};
use ferb_lang_interpreter::thunk::{Step, Thunk};
use ferb_lang_interpreter::{run, Error, Execution};

fn runtime_error(error: EvaluationError) -> Result<(), Error> {
    Err(Error::Evaluation(error))
}

#[test]
fn unforced_bindings_never_fail() {
    let execution = run("y = 1 / 0\nrintperb 'fine'");
    assert_eq!(
        execution,
        Execution {
            output: vec!["fine".to_string()],
            result: Ok(()),
        }
    );

    let execution = run("y = 1 / 0\nrintperb 'before'\nrintperb y");
    assert_eq!(execution.output, vec!["before"]);
    assert_eq!(execution.result, runtime_error(EvaluationError::DivisionByZero));
}

#[test]
fn forcing_twice_computes_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let thunk = Thunk::lazy(move || {
        counter.set(counter.get() + 1);
        Ok(Step::Done(Value::Integer(42)))
    });
    let sum = Thunk::zip(thunk.clone(), thunk.clone(), |left, right| match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => Ok(Step::Done(Value::Integer(left + right))),
        _ => Err(EvaluationError::IntegerOverflow),
    });

    assert_eq!(sum.force(), Ok(Value::Integer(84)));
    assert_eq!(thunk.force(), Ok(Value::Integer(42)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn lists_are_indexed_from_one() {
    let execution = run("arr = [10, 20, 30]\nrintperb arr[1]\nrintperb arr[3]");
    assert_eq!(execution.output, vec!["10", "30"]);
    assert_eq!(execution.result, Ok(()));

    for index in [0, 4] {
        let execution = run(&format!("arr = [10, 20, 30]\nrintperb arr[{}]", index));
        assert_eq!(
            execution.result,
            runtime_error(EvaluationError::IndexOutOfBounds { index, length: 3 }),
            "index {}",
            index
        );
    }
}

#[test]
fn logical_operators_short_circuit() {
    let execution = run(
        "rintperb alseferb ndaerb 1 / 0 > 0
rintperb rueterb or missing
rintperb alseferb or rueterb",
    );
    assert_eq!(execution.output, vec!["alseferb", "rueterb", "rueterb"]);
    assert_eq!(execution.result, Ok(()));
}

#[test]
fn first_matching_case_wins() {
    let source = |value: i64| {
        format!(
            "atchmerb {}
  asecerb 1 henterb rintperb 'one'
  asecerb _ henterb rintperb 'other'
ndeerb",
            value
        )
    };

    assert_eq!(run(&source(1)).output, vec!["one"]);
    assert_eq!(run(&source(2)).output, vec!["other"]);
}

#[test]
fn records_check_arity() {
    let definition = "hingterb P\n  rgaerb x\n  rgaerb y\nndeerb\n";

    let execution = run(&format!("{}p = ewnerb P [1]\nrintperb p", definition));
    assert_eq!(
        execution.result,
        runtime_error(EvaluationError::ArityMismatch {
            type_name: "P".into(),
            expected: 2,
            actual: 1,
        })
    );

    let execution = run(&format!(
        "{}p = ewnerb P [1, 2]\nrintperb p.x == 1\nrintperb p.y == 2\nrintperb p",
        definition
    ));
    assert_eq!(execution.output, vec!["rueterb", "rueterb", "P { x: 1, y: 2 }"]);
    assert_eq!(execution.result, Ok(()));
}

#[test]
fn output_before_a_failure_is_kept() {
    let execution = run("x = [10, 20, 30]\nrintperb x[3]\nrintperb 1 / 0\nrintperb 'unreachable'");

    assert_eq!(
        execution,
        Execution {
            output: vec!["30".to_string()],
            result: runtime_error(EvaluationError::DivisionByZero),
        }
    );
}

#[test]
fn record_types_are_defined_once() {
    let execution = run("hingterb P\n  rgaerb x\nndeerb\nhingterb P\n  rgaerb y\nndeerb");

    assert_eq!(
        execution.result,
        runtime_error(EvaluationError::DuplicateRecordDefinition("P".into()))
    );
}

#[test]
fn bindings_keep_the_values_they_saw() {
    let execution = run(
        "x = 1
y = x + 1
x = 100
rintperb y
rintperb x",
    );

    assert_eq!(execution.output, vec!["2", "100"]);
}

#[test]
fn long_dependency_chains_are_forced_iteratively() {
    let mut source = String::from("total = 0\n");
    for i in 0..50_000 {
        source.push_str(&format!("total = total + {}\n", i % 3));
    }
    source.push_str("rintperb total");

    let execution = run(&source);
    assert_eq!(execution.output, vec!["49999"]);
}

#[test]
fn deeply_nested_lists_are_built_and_released() {
    let mut source = String::from("x = []\n");
    for _ in 0..100_000 {
        source.push_str("x = [x]\n");
    }
    source.push_str("rintperb 'done'\n");

    let execution = run(&source);
    assert_eq!(execution.output, vec!["done"]);
    assert_eq!(execution.result, Ok(()));
}

#[test]
fn increments_inside_logical_operands_update_the_binding() {
    let execution = run(
        "n = 0
rintperb rueterb ndaerb n++ > 0
rintperb n
rintperb n++ > 0
rintperb n",
    );

    assert_eq!(execution.output, vec!["rueterb", "1", "rueterb", "2"]);
}

#[test]
fn parse_errors_stop_before_running() {
    let execution = run("rintperb 1\nrintperb (2");

    assert!(execution.output.is_empty());
    assert!(matches!(execution.result, Err(Error::Parse(_))));
}

#[test]
fn a_small_program() {
    let execution = run(
        "^^ classify a few numbers
hingterb Tally
  rgaerb evens
  rgaerb odds
ndeerb

evens = 0
odds = 0
orferb n in [1, 2, 3, 4, 5]
  if n % 2 == 0 henterb
    evens++
  lseerb
    odds++
  ndeerb
ndeerb

tally = ewnerb Tally [evens, odds]
rintperb tally
atchmerb tally.odds
  asecerb 3 henterb rintperb 'three odds'
lseerb
  rintperb 'something else'
ndeerb",
    );

    assert_eq!(execution.output, vec!["Tally { evens: 2, odds: 3 }", "three odds"]);
    assert_eq!(execution.result, Ok(()));
}
