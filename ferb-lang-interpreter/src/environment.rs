use std::rc::Rc;

use rpds::HashTrieMap;

use crate::object::{EvaluationError, Value};
use crate::thunk::Thunk;

/// Name to thunk bindings.
///
/// The map is persistent, so a clone is a snapshot: later assignments to the
/// original never show through it.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    store: HashTrieMap<Rc<str>, Thunk>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            store: HashTrieMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Thunk> {
        self.store.get(key).cloned()
    }

    pub fn set(&mut self, key: Rc<str>, value: Thunk) {
        self.store.insert_mut(key, value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Overwrites an existing binding with an already computed value.
    pub fn replace_forced(&mut self, key: &str, value: Value) -> Result<(), EvaluationError> {
        if !self.contains(key) {
            return Err(EvaluationError::UndefinedVariable(key.into()));
        }
        self.store.insert_mut(key.into(), Thunk::forced(value));
        Ok(())
    }
}

/// Field lists of the defined record types.
#[derive(Debug, Clone, Default)]
pub struct RecordRegistry {
    definitions: HashTrieMap<Rc<str>, Rc<[Rc<str>]>>,
}

impl RecordRegistry {
    pub fn new() -> Self {
        RecordRegistry {
            definitions: HashTrieMap::new(),
        }
    }

    pub fn define(&mut self, name: Rc<str>, fields: Rc<[Rc<str>]>) -> Result<(), EvaluationError> {
        if self.definitions.contains_key(&*name) {
            return Err(EvaluationError::DuplicateRecordDefinition(name));
        }
        self.definitions.insert_mut(name, fields);
        Ok(())
    }

    pub fn fields(&self, name: &str) -> Option<Rc<[Rc<str>]>> {
        self.definitions.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_are_independent() {
        let mut environment = Environment::new();
        environment.set("x".into(), Thunk::forced(Value::Integer(1)));

        let snapshot = environment.clone();
        environment.set("x".into(), Thunk::forced(Value::Integer(2)));
        environment.set("y".into(), Thunk::forced(Value::Integer(3)));

        assert_eq!(snapshot.get("x").and_then(|x| x.peek()), Some(Value::Integer(1)));
        assert!(!snapshot.contains("y"));
        assert_eq!(environment.get("x").and_then(|x| x.peek()), Some(Value::Integer(2)));
    }

    #[test]
    fn test_replace_forced() {
        let mut environment = Environment::new();
        assert_eq!(
            environment.replace_forced("n", Value::Integer(1)),
            Err(EvaluationError::UndefinedVariable("n".into()))
        );

        environment.set("n".into(), Thunk::forced(Value::Integer(1)));
        environment
            .replace_forced("n", Value::Integer(2))
            .unwrap();
        assert_eq!(environment.get("n").and_then(|n| n.peek()), Some(Value::Integer(2)));
    }

    #[test]
    fn test_record_definitions_are_unique() {
        let mut records = RecordRegistry::new();
        let fields: Rc<[Rc<str>]> = Rc::from(vec![Rc::from("x"), Rc::from("y")]);

        records.define("P".into(), fields.clone()).unwrap();
        assert_eq!(records.fields("P"), Some(fields.clone()));
        assert_eq!(
            records.define("P".into(), fields),
            Err(EvaluationError::DuplicateRecordDefinition("P".into()))
        );
        assert_eq!(records.fields("Q"), None);
    }
}
