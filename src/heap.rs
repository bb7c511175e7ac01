//! The heap model.
//!
//! Mutation is encoded functionally: every write to an object (or array) wraps its current state
//! in a `FieldAssign` node, so the state of a cell is a chain of writes rooted at `Ref(address)`.
//! Reads are `FieldAccess` nodes over the current state, together with the state right before the
//! last write to the read field. The solver translation turns both into array stores and selects.
//!
//! All maps are persistent, cloning a `Memory` takes a cheap snapshot.

mod array;
mod reference;

pub use reference::*;

use std::rc::Rc;

use derivative::Derivative;
use im_rc::Vector;
use slog::{debug, Logger};

use crate::{
    error::{invalid_handle, unification_error, Result},
    syntax::{Address, Expression, FieldIndex, Identifier, RuntimeType},
    typeable::Typeable,
};

pub type ImHashMap<K, V> = im_rc::HashMap<K, V>;

#[derive(Debug, Clone)]
struct Cell {
    kind: MemoryKind,
    tag: Identifier,
    /// Append-only, the last entry is the current state.
    versions: Vector<Rc<Expression>>,
}

impl Cell {
    fn current(&self, address: Address) -> Rc<Expression> {
        self.versions
            .last()
            .cloned()
            .unwrap_or_else(|| Expression::reference(address))
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Memory {
    next_address: Address,
    next_primitive: usize,
    cells: ImHashMap<Address, Cell>,
    pre_write: ImHashMap<(Address, FieldIndex), Rc<Expression>>,
    /// Value type of every written field, per tag, so all objects of a tag agree.
    field_types: ImHashMap<(Identifier, FieldIndex), RuntimeType>,
    primitives: ImHashMap<usize, Rc<Expression>>,
    #[derivative(Debug = "ignore")]
    logger: Logger,
}

impl Memory {
    pub fn new(logger: Logger) -> Memory {
        Memory {
            next_address: 1,
            next_primitive: 0,
            cells: ImHashMap::new(),
            pre_write: ImHashMap::new(),
            field_types: ImHashMap::new(),
            primitives: ImHashMap::new(),
            logger,
        }
    }

    /// Objects and arrays draw from one address counter, addresses are never reused.
    /// The tag of a primitive is only logged.
    pub fn allocate(&mut self, kind: MemoryKind, tag: impl Into<Identifier>) -> Ref {
        let tag = tag.into();
        let ref_ = match kind {
            MemoryKind::Primitive => {
                let id = self.next_primitive;
                self.next_primitive += 1;
                Ref::Primitive { id }
            }
            MemoryKind::Object | MemoryKind::Array => {
                let address = self.next_address;
                self.next_address += 1;
                self.cells.insert(
                    address,
                    Cell {
                        kind,
                        tag: tag.clone(),
                        versions: Vector::unit(Expression::reference(address)),
                    },
                );
                if kind == MemoryKind::Object {
                    Ref::Object {
                        address,
                        struct_tag: tag.clone(),
                    }
                } else {
                    Ref::Array {
                        address,
                        array_tag: tag.clone(),
                    }
                }
            }
        };
        debug!(self.logger, "allocated"; "handle" => ?ref_, "tag" => %tag);
        ref_
    }

    pub fn assign_primitive(&mut self, primitive: &Ref, value: Rc<Expression>) -> Result<()> {
        let id = self.primitive_id(primitive)?;
        let type_ = value.type_of();
        if type_.is_function_type() {
            return Err(unification_error("a value type", type_));
        }
        self.primitives.insert(id, value);
        Ok(())
    }

    pub fn get_primitive(&self, primitive: &Ref) -> Result<Rc<Expression>> {
        let id = self.primitive_id(primitive)?;
        self.primitives
            .get(&id)
            .cloned()
            .ok_or_else(|| invalid_handle(primitive, "primitive was never assigned"))
    }

    /// Records a write of `value` to `field`, returning the new state of the object.
    pub fn assign_field(
        &mut self,
        object: &Ref,
        field: FieldIndex,
        value: Rc<Expression>,
    ) -> Result<Rc<Expression>> {
        self.write(object, MemoryKind::Object, field, value)
    }

    pub fn get_field(
        &self,
        object: &Ref,
        field: FieldIndex,
        type_: RuntimeType,
    ) -> Result<Rc<Expression>> {
        self.read(object, MemoryKind::Object, field, type_)
    }

    /// The current state of an object or array.
    pub fn current(&self, ref_: &Ref) -> Result<Rc<Expression>> {
        let (address, cell) = self.cell(ref_, ref_.kind())?;
        Ok(cell.current(address))
    }

    /// Every state an object or array went through, oldest first.
    pub fn history(&self, ref_: &Ref) -> Result<&Vector<Rc<Expression>>> {
        let (_, cell) = self.cell(ref_, ref_.kind())?;
        Ok(&cell.versions)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    fn write(
        &mut self,
        ref_: &Ref,
        kind: MemoryKind,
        field: FieldIndex,
        value: Rc<Expression>,
    ) -> Result<Rc<Expression>> {
        let (address, cell) = self.cell(ref_, kind)?;
        let current = cell.current(address);
        let key = (cell.tag.clone(), field);
        let value_type = value.type_of();
        if let Some(written) = self.field_types.get(&key) {
            if *written != value_type {
                return Err(unification_error(written, value_type));
            }
        }
        let assign = Expression::field_assign(current.clone(), field, value, cell.tag.clone())?;

        debug!(self.logger, "write"; "address" => address, "field" => field, "type" => %value_type);
        self.pre_write.insert((address, field), current);
        self.field_types.insert(key, value_type);
        if let Some(cell) = self.cells.get_mut(&address) {
            cell.versions.push_back(assign.clone());
        }
        Ok(assign)
    }

    fn read(
        &self,
        ref_: &Ref,
        kind: MemoryKind,
        field: FieldIndex,
        type_: RuntimeType,
    ) -> Result<Rc<Expression>> {
        let (address, cell) = self.cell(ref_, kind)?;
        if let Some(written) = self.field_types.get(&(cell.tag.clone(), field)) {
            if *written != type_ {
                return Err(unification_error(written, type_));
            }
        }
        let prior = self.pre_write.get(&(address, field)).cloned();
        Expression::field_access(cell.current(address), field, prior, cell.tag.clone(), type_)
    }

    /// Resolves a handle, rejecting forged handles, kind mismatches and tag mismatches.
    fn cell(&self, ref_: &Ref, expected: MemoryKind) -> Result<(Address, &Cell)> {
        let (address, tag) = match (ref_.address(), ref_.tag()) {
            (Some(address), Some(tag)) if ref_.kind() == expected => (address, tag),
            _ => {
                return Err(invalid_handle(
                    ref_,
                    format!("expected {:?} handle", expected),
                ))
            }
        };
        let cell = self
            .cells
            .get(&address)
            .ok_or_else(|| invalid_handle(ref_, "address was never allocated"))?;
        if cell.kind != expected || &cell.tag != tag {
            return Err(invalid_handle(
                ref_,
                format!("address holds {:?} '{}'", cell.kind, cell.tag),
            ));
        }
        Ok((address, cell))
    }

    fn primitive_id(&self, ref_: &Ref) -> Result<usize> {
        match ref_ {
            Ref::Primitive { id } if *id < self.next_primitive => Ok(*id),
            Ref::Primitive { .. } => Err(invalid_handle(ref_, "primitive was never allocated")),
            _ => Err(invalid_handle(ref_, "expected Primitive handle")),
        }
    }
}

#[cfg(test)]
mod tests {
    use slog::{o, Discard};

    use super::*;
    use crate::{dsl::*, error::Error};

    fn memory() -> Memory {
        Memory::new(Logger::root(Discard, o!()))
    }

    #[test]
    fn addresses_are_shared_and_never_zero() {
        let mut memory = memory();
        let a = memory.allocate(MemoryKind::Object, "Person");
        let b = memory.allocate(MemoryKind::Array, "ints");
        let p = memory.allocate(MemoryKind::Primitive, "x");
        let c = memory.allocate(MemoryKind::Object, "Person");
        assert_eq!(a.address(), Some(1));
        assert_eq!(b.address(), Some(2));
        assert_eq!(p, Ref::Primitive { id: 0 });
        assert_eq!(c.address(), Some(3));
        assert_ne!(a, c);
    }

    #[test]
    fn primitives() {
        let mut memory = memory();
        let x = memory.allocate(MemoryKind::Primitive, "x");
        assert!(matches!(
            memory.get_primitive(&x),
            Err(Error::InvalidHandle { .. })
        ));
        memory.assign_primitive(&x, Expression::int(3)).unwrap();
        memory.assign_primitive(&x, int_var("y")).unwrap();
        assert_eq!(memory.get_primitive(&x).unwrap(), int_var("y"));

        let forged = Ref::Primitive { id: 7 };
        assert!(memory.assign_primitive(&forged, Expression::int(1)).is_err());
    }

    #[test]
    fn writes_chain_and_record_prior_state() {
        let mut memory = memory();
        let person = memory.allocate(MemoryKind::Object, "Person");
        let first = memory
            .assign_field(&person, 0, Expression::int(30))
            .unwrap();
        let second = memory
            .assign_field(&person, 0, Expression::int(35))
            .unwrap();
        assert_eq!(second.to_string(), "ref(1)[Person.0 := 30][Person.0 := 35]");
        assert_eq!(memory.current(&person).unwrap(), second);
        assert_eq!(
            memory.history(&person).unwrap().iter().cloned().collect::<Vec<_>>(),
            vec![Expression::reference(1), first.clone(), second.clone()]
        );

        let read = memory
            .get_field(&person, 0, RuntimeType::IntRuntimeType)
            .unwrap();
        match read.as_ref() {
            Expression::FieldAccess { object, prior, .. } => {
                assert_eq!(object, &second);
                assert_eq!(prior, &Some(first));
            }
            other => panic!("expected a field access, got {:?}", other),
        }

        let unwritten = memory
            .get_field(&person, 1, RuntimeType::BoolRuntimeType)
            .unwrap();
        assert!(matches!(
            unwritten.as_ref(),
            Expression::FieldAccess { prior: None, .. }
        ));
    }

    #[test]
    fn reads_must_match_written_type() {
        let mut memory = memory();
        let person = memory.allocate(MemoryKind::Object, "Person");
        memory
            .assign_field(&person, 0, Expression::int(30))
            .unwrap();
        let err = memory.get_field(&person, 0, RuntimeType::BoolRuntimeType);
        assert!(matches!(err, Err(Error::Unification { .. })));
    }

    #[test]
    fn writes_must_keep_field_type() {
        let mut memory = memory();
        let person = memory.allocate(MemoryKind::Object, "Person");
        memory
            .assign_field(&person, 0, Expression::int(30))
            .unwrap();
        let err = memory.assign_field(&person, 0, Expression::bool(true));
        assert!(matches!(err, Err(Error::Unification { .. })));
        assert_eq!(memory.history(&person).unwrap().len(), 2);
        assert!(memory
            .get_field(&person, 0, RuntimeType::BoolRuntimeType)
            .is_err());

        // objects of one tag share the field's type
        let other = memory.allocate(MemoryKind::Object, "Person");
        let err = memory.assign_field(&other, 0, Expression::bool(false));
        assert!(matches!(err, Err(Error::Unification { .. })));
        assert!(memory
            .get_field(&other, 0, RuntimeType::BoolRuntimeType)
            .is_err());

        // other tags are unaffected
        let car = memory.allocate(MemoryKind::Object, "Car");
        assert!(memory
            .assign_field(&car, 0, Expression::bool(false))
            .is_ok());
    }

    #[test]
    fn invalid_handles() {
        let mut memory = memory();
        let person = memory.allocate(MemoryKind::Object, "Person");

        let unallocated = Ref::Object {
            address: 42,
            struct_tag: "Person".into(),
        };
        assert!(matches!(
            memory.assign_field(&unallocated, 0, Expression::int(1)),
            Err(Error::InvalidHandle { .. })
        ));

        let wrong_tag = Ref::Object {
            address: person.address().unwrap(),
            struct_tag: "Car".into(),
        };
        assert!(memory
            .get_field(&wrong_tag, 0, RuntimeType::IntRuntimeType)
            .is_err());

        let primitive = memory.allocate(MemoryKind::Primitive, "x");
        assert!(memory.current(&primitive).is_err());
        assert!(memory.assign_primitive(&person, Expression::int(1)).is_err());
    }

    #[test]
    fn snapshots_are_independent() {
        let mut memory = memory();
        let person = memory.allocate(MemoryKind::Object, "Person");
        let snapshot = memory.clone();
        memory
            .assign_field(&person, 0, Expression::int(30))
            .unwrap();
        assert_eq!(snapshot.current(&person).unwrap(), Expression::reference(1));
        assert_eq!(memory.history(&person).unwrap().len(), 2);
    }
}
