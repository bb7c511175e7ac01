use std::rc::Rc;

use crate::{
    error::Result,
    syntax::{Expression, RuntimeType},
};

use super::{Memory, MemoryKind, Ref};

/// Arrays share the object encoding, the element index takes the place of the field index.
impl Memory {
    pub fn assign_to_array(
        &mut self,
        array: &Ref,
        index: usize,
        value: Rc<Expression>,
    ) -> Result<Rc<Expression>> {
        self.write(array, MemoryKind::Array, index, value)
    }

    pub fn get_from_array(
        &self,
        array: &Ref,
        index: usize,
        type_: RuntimeType,
    ) -> Result<Rc<Expression>> {
        self.read(array, MemoryKind::Array, index, type_)
    }
}

#[cfg(test)]
mod tests {
    use slog::{o, Discard, Logger};

    use super::*;
    use crate::error::Error;

    #[test]
    fn arrays_reject_object_handles() {
        let mut memory = Memory::new(Logger::root(Discard, o!()));
        let object = memory.allocate(MemoryKind::Object, "Node");
        let err = memory.assign_to_array(&object, 0, Expression::int(1));
        assert!(matches!(err, Err(Error::InvalidHandle { .. })));

        let array = memory.allocate(MemoryKind::Array, "ints");
        assert!(memory.assign_field(&array, 0, Expression::int(1)).is_err());
    }

    #[test]
    fn elements_are_independent() {
        let mut memory = Memory::new(Logger::root(Discard, o!()));
        let array = memory.allocate(MemoryKind::Array, "ints");
        for i in 0..3 {
            memory
                .assign_to_array(&array, i, Expression::int(i as i64 * 10))
                .unwrap();
        }
        let read = memory
            .get_from_array(&array, 1, RuntimeType::IntRuntimeType)
            .unwrap();
        match read.as_ref() {
            Expression::FieldAccess { field, prior, .. } => {
                assert_eq!(*field, 1);
                // written second, so the prior state holds only index 0
                assert_eq!(
                    prior.as_ref().unwrap().to_string(),
                    "ref(1)[ints.0 := 0]"
                );
            }
            other => panic!("expected a field access, got {:?}", other),
        }
        assert_eq!(memory.history(&array).unwrap().len(), 4);
    }
}
