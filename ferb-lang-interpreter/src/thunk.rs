use std::cell::RefCell;
use std::rc::Rc;

use crate::object::{EvaluationError, Value};

/// What a resumed computation produced: a value, or another thunk whose
/// value becomes this thunk's value.
pub enum Step {
    Done(Value),
    Defer(Thunk),
}

type Resume = Box<dyn FnOnce(Vec<Value>, Vec<Thunk>) -> Result<Step, EvaluationError>>;

/// `inputs` are forced before `resume` runs; `deferred` are handed over
/// untouched.
struct Suspension {
    inputs: Vec<Thunk>,
    deferred: Vec<Thunk>,
    resume: Resume,
}

enum ThunkState {
    Pending(Suspension),
    Running,
    Delegated(Thunk),
    Forced(Value),
    Failed(EvaluationError),
}

/// A memoizing deferred computation.
///
/// Forcing never recurses on the native stack: inputs and delegation targets
/// are pushed onto an explicit work list, so arbitrarily long chains of
/// bindings can be forced.
#[derive(Clone)]
pub struct Thunk(Rc<RefCell<ThunkState>>);

enum Progress {
    Settled,
    Await(Thunk),
    Follow(Thunk),
    Ready,
}

impl Thunk {
    fn new(state: ThunkState) -> Self {
        Thunk(Rc::new(RefCell::new(state)))
    }

    pub fn forced(value: Value) -> Self {
        Self::new(ThunkState::Forced(value))
    }

    /// A fresh cell that takes its value from `target`.
    pub fn alias(target: Thunk) -> Self {
        Self::new(ThunkState::Delegated(target))
    }

    pub fn lazy(compute: impl FnOnce() -> Result<Step, EvaluationError> + 'static) -> Self {
        Self::suspend(Vec::new(), move |_| compute())
    }

    /// Runs `resume` with the forced values of `inputs`, in order. If any
    /// input fails, the thunk fails with the same error and `resume` is
    /// never called.
    pub fn suspend(
        inputs: Vec<Thunk>,
        resume: impl FnOnce(Vec<Value>) -> Result<Step, EvaluationError> + 'static,
    ) -> Self {
        Self::new(ThunkState::Pending(Suspension {
            inputs,
            deferred: Vec::new(),
            resume: Box::new(move |values: Vec<Value>, _: Vec<Thunk>| resume(values)),
        }))
    }

    /// Runs `resume` with the forced value of `input` and `deferred` as it
    /// is, leaving it to `resume` whether `deferred` is ever needed.
    pub fn branch(
        input: Thunk,
        deferred: Thunk,
        resume: impl FnOnce(Value, Thunk) -> Result<Step, EvaluationError> + 'static,
    ) -> Self {
        Self::new(ThunkState::Pending(Suspension {
            inputs: vec![input],
            deferred: vec![deferred],
            resume: Box::new(move |values: Vec<Value>, deferred: Vec<Thunk>| {
                let (Ok([value]), Ok([deferred])) = (
                    <[Value; 1]>::try_from(values),
                    <[Thunk; 1]>::try_from(deferred),
                ) else {
                    return Err(EvaluationError::ReentrantForce);
                };
                resume(value, deferred)
            }),
        }))
    }

    pub fn then(
        input: Thunk,
        resume: impl FnOnce(Value) -> Result<Step, EvaluationError> + 'static,
    ) -> Self {
        Self::suspend(vec![input], move |values| {
            let Ok([value]) = <[Value; 1]>::try_from(values) else {
                return Err(EvaluationError::ReentrantForce);
            };
            resume(value)
        })
    }

    pub fn zip(
        left: Thunk,
        right: Thunk,
        resume: impl FnOnce(Value, Value) -> Result<Step, EvaluationError> + 'static,
    ) -> Self {
        Self::suspend(vec![left, right], move |values| {
            let Ok([left, right]) = <[Value; 2]>::try_from(values) else {
                return Err(EvaluationError::ReentrantForce);
            };
            resume(left, right)
        })
    }

    /// The memoized outcome, if this thunk has already been forced.
    pub fn settled(&self) -> Option<Result<Value, EvaluationError>> {
        match &*self.0.try_borrow().ok()? {
            ThunkState::Forced(value) => Some(Ok(value.clone())),
            ThunkState::Failed(error) => Some(Err(error.clone())),
            _ => None,
        }
    }

    pub fn peek(&self) -> Option<Value> {
        self.settled().and_then(Result::ok)
    }

    pub fn is_forced(&self) -> bool {
        self.settled().is_some()
    }

    pub fn force(&self) -> Result<Value, EvaluationError> {
        let mut stack = vec![self.clone()];

        while let Some(thunk) = stack.last().cloned() {
            match thunk.progress()? {
                Progress::Settled => {
                    stack.pop();
                }
                Progress::Await(input) => stack.push(input),
                Progress::Follow(target) => match target.settled() {
                    Some(result) => thunk.settle(result),
                    None => stack.push(target),
                },
                Progress::Ready => thunk.resume(),
            }
        }

        self.settled().unwrap_or(Err(EvaluationError::ReentrantForce))
    }

    /// Forces the value and, transitively, every list element and record
    /// field inside it.
    pub fn force_deep(&self) -> Result<Value, EvaluationError> {
        let value = self.force()?;

        let mut pending = vec![value.clone()];
        while let Some(next) = pending.pop() {
            match next {
                Value::List(elements) => {
                    for element in elements.iter() {
                        pending.push(element.force()?);
                    }
                }
                Value::Record(record) => {
                    pending.extend(record.fields.iter().map(|(_, value)| value.clone()))
                }
                _ => {}
            }
        }

        Ok(value)
    }

    fn progress(&self) -> Result<Progress, EvaluationError> {
        let state = self
            .0
            .try_borrow()
            .map_err(|_| EvaluationError::ReentrantForce)?;
        match &*state {
            ThunkState::Forced(_) | ThunkState::Failed(_) => Ok(Progress::Settled),
            ThunkState::Running => Err(EvaluationError::ReentrantForce),
            ThunkState::Delegated(target) => Ok(Progress::Follow(target.clone())),
            ThunkState::Pending(suspension) => Ok(suspension
                .inputs
                .iter()
                .find(|input| !input.is_forced())
                .map(|input| Progress::Await(input.clone()))
                .unwrap_or(Progress::Ready)),
        }
    }

    fn settle(&self, result: Result<Value, EvaluationError>) {
        *self.0.borrow_mut() = match result {
            Ok(value) => ThunkState::Forced(value),
            Err(error) => ThunkState::Failed(error),
        };
    }

    fn resume(&self) {
        let state = std::mem::replace(&mut *self.0.borrow_mut(), ThunkState::Running);
        let (inputs, deferred, resume) = match state {
            ThunkState::Pending(Suspension {
                inputs,
                deferred,
                resume,
            }) => (inputs, deferred, resume),
            other => {
                *self.0.borrow_mut() = other;
                return;
            }
        };

        let values = inputs
            .iter()
            .map(|input| input.settled().unwrap_or(Err(EvaluationError::ReentrantForce)))
            .collect::<Result<Vec<_>, _>>();
        drop(inputs);

        let next = match values.and_then(|values| resume(values, deferred)) {
            Ok(Step::Done(value)) => ThunkState::Forced(value),
            Ok(Step::Defer(target)) => ThunkState::Delegated(target),
            Err(error) => ThunkState::Failed(error),
        };
        *self.0.borrow_mut() = next;
    }

    /// Detaches what this thunk still refers to, if nothing else owns it.
    fn release(
        &self,
        released: &mut Vec<Thunk>,
        values: &mut Vec<Value>,
        computations: &mut Vec<Resume>,
    ) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        let Ok(mut state) = self.0.try_borrow_mut() else {
            return;
        };
        match std::mem::replace(&mut *state, ThunkState::Running) {
            ThunkState::Pending(suspension) => {
                released.extend(suspension.inputs);
                released.extend(suspension.deferred);
                computations.push(suspension.resume);
            }
            ThunkState::Delegated(target) => released.push(target),
            ThunkState::Forced(value) => values.push(value),
            ThunkState::Running | ThunkState::Failed(_) => {}
        }
    }
}

/// Takes apart uniquely owned thunks and values one level at a time, so
/// deeply nested lists, records and chains are freed without recursion.
pub(crate) fn dismantle(mut released: Vec<Thunk>, mut values: Vec<Value>) {
    let mut computations = Vec::new();
    loop {
        if let Some(value) = values.pop() {
            match value {
                Value::List(elements) => {
                    if let Ok(elements) = Rc::try_unwrap(elements) {
                        released.extend(elements);
                    }
                }
                Value::Record(mut record) => {
                    if let Some(record) = Rc::get_mut(&mut record) {
                        values.extend(
                            std::mem::take(&mut record.fields)
                                .into_iter()
                                .map(|(_, value)| value),
                        );
                    }
                }
                _ => {}
            }
        } else if let Some(thunk) = released.pop() {
            thunk.release(&mut released, &mut values, &mut computations);
        } else {
            break;
        }
    }
}

impl Drop for Thunk {
    fn drop(&mut self) {
        let mut released = Vec::new();
        let mut values = Vec::new();
        let mut computations = Vec::new();
        self.release(&mut released, &mut values, &mut computations);
        dismantle(released, values);
    }
}

impl PartialEq for Thunk {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.settled(), other.settled()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

impl std::fmt::Debug for Thunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.settled() {
            Some(Ok(value)) => f.debug_tuple("Thunk").field(&value).finish(),
            Some(Err(error)) => f.debug_tuple("Thunk").field(&error).finish(),
            None => write!(f, "Thunk(<unforced>)"),
        }
    }
}
