//! KLEE-Style Symbolic Memory Model
//!
//! Academic References:
//! - Cadar, C., Dunbar, D., Engler, D. (2008). "KLEE: Unassisted and Automatic
//!   Generation of High-Coverage Tests for Complex Systems Programs"
//! - Baldoni, R. et al. (2018). "A Survey of Symbolic Execution Techniques"
//!
//! Key Features:
//! - **Copy-on-Write Objects**: Memory objects with lazy copying
//! - **Symbolic Addresses**: Support for symbolic pointer arithmetic
//! - **Object Resolution**: Efficient lookup for symbolic pointers
//! - **Path Conditions**: Integrated constraint management
//!
//! ## Memory Model
//!
//! ```text
//! Memory ::= ObjectStore × AddressSpace × PathConditions
//!
//! ObjectStore = ObjectId → MemoryObject
//! AddressSpace = Address → ObjectId
//! ```
//!
//! ## KLEE's Key Insight
//!
//! Instead of modeling memory as a flat byte array, model it as a collection
//! of memory objects. This allows:
//! - Efficient copy-on-write during forking
//! - Precise aliasing analysis
//! - Sound handling of symbolic pointers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════
// Core Types
// ═══════════════════════════════════════════════════════════════════════════

/// Unique object identifier
pub type ObjectId = u64;

/// Memory address (can be concrete or symbolic)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    /// Concrete address
    Concrete(u64),
    /// Symbolic address: base + symbolic_offset
    Symbolic {
        base_object: ObjectId,
        offset: SymbolicExpr,
    },
    /// Null pointer
    Null,
    /// Invalid/uninitialized
    Invalid,
}

/// Symbolic expression for addresses/values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicExpr {
    /// Concrete value
    Concrete(i64),
    /// Symbolic variable
    Symbol(String),
    /// Addition: e1 + e2
    Add(Box<SymbolicExpr>, Box<SymbolicExpr>),
    /// Subtraction: e1 - e2
    Sub(Box<SymbolicExpr>, Box<SymbolicExpr>),
    /// Multiplication: e1 * e2
    Mul(Box<SymbolicExpr>, Box<SymbolicExpr>),
    /// Conditional: if cond then e1 else e2
    Ite(Box<PathCondition>, Box<SymbolicExpr>, Box<SymbolicExpr>),
}

impl SymbolicExpr {
    pub fn concrete(val: i64) -> Self {
        Self::Concrete(val)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn add(self, other: Self) -> Self {
        match (&self, &other) {
            (Self::Concrete(a), Self::Concrete(b)) => Self::Concrete(a + b),
            _ => Self::Add(Box::new(self), Box::new(other)),
        }
    }

    pub fn sub(self, other: Self) -> Self {
        match (&self, &other) {
            (Self::Concrete(a), Self::Concrete(b)) => Self::Concrete(a - b),
            _ => Self::Sub(Box::new(self), Box::new(other)),
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Concrete(_))
    }

    pub fn as_concrete(&self) -> Option<i64> {
        match self {
            Self::Concrete(v) => Some(*v),
            _ => None,
        }
    }

    /// Get all symbolic variables in this expression
    pub fn free_symbols(&self) -> HashSet<String> {
        let mut symbols = HashSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut HashSet<String>) {
        match self {
            Self::Concrete(_) => {}
            Self::Symbol(s) => {
                symbols.insert(s.clone());
            }
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) => {
                a.collect_symbols(symbols);
                b.collect_symbols(symbols);
            }
            Self::Ite(_, t, e) => {
                t.collect_symbols(symbols);
                e.collect_symbols(symbols);
            }
        }
    }
}

/// Path condition for symbolic execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathCondition {
    /// True
    True,
    /// False
    False,
    /// Comparison: e1 op e2
    Compare {
        lhs: SymbolicExpr,
        op: CompareOp,
        rhs: SymbolicExpr,
    },
    /// Logical AND
    And(Vec<PathCondition>),
    /// Logical OR
    Or(Vec<PathCondition>),
    /// Logical NOT
    Not(Box<PathCondition>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl PathCondition {
    pub fn and(conditions: Vec<Self>) -> Self {
        let filtered: Vec<_> = conditions
            .into_iter()
            .filter(|c| *c != Self::True)
            .collect();
        match filtered.len() {
            0 => Self::True,
            1 => filtered.into_iter().next().unwrap(),
            _ => Self::And(filtered),
        }
    }

    pub fn or(conditions: Vec<Self>) -> Self {
        let filtered: Vec<_> = conditions
            .into_iter()
            .filter(|c| *c != Self::False)
            .collect();
        match filtered.len() {
            0 => Self::False,
            1 => filtered.into_iter().next().unwrap(),
            _ => Self::Or(filtered),
        }
    }

    pub fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Memory Object (KLEE-style)
// ═══════════════════════════════════════════════════════════════════════════

/// Memory object - represents a contiguous region of memory
///
/// Examples:
/// - Stack allocation: local variable
/// - Heap allocation: malloc result
/// - Global: global variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryObject {
    /// Unique identifier
    pub id: ObjectId,
    /// Object name (for debugging)
    pub name: String,
    /// Size in bytes (may be symbolic)
    pub size: SymbolicExpr,
    /// Base address
    pub address: u64,
    /// Is this object allocated on the heap?
    pub is_heap: bool,
    /// Is this object symbolic?
    pub is_symbolic: bool,
    /// Object contents: offset → value
    pub contents: BTreeMap<i64, SymbolicValue>,
    /// Is this object freed?
    pub is_freed: bool,
    /// Allocation site (for debugging)
    pub alloc_site: Option<String>,
}

/// Symbolic value stored in memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SymbolicValue {
    /// Concrete byte value
    Concrete(u8),
    /// Concrete integer (4/8 bytes)
    ConcreteInt(i64),
    /// Symbolic expression
    Symbolic(SymbolicExpr),
    /// Pointer to another object
    Pointer(Address),
    /// Uninitialized
    Uninitialized,
}

impl MemoryObject {
    pub fn new(id: ObjectId, name: impl Into<String>, size: i64, address: u64) -> Self {
        Self {
            id,
            name: name.into(),
            size: SymbolicExpr::concrete(size),
            address,
            is_heap: false,
            is_symbolic: false,
            contents: BTreeMap::new(),
            is_freed: false,
            alloc_site: None,
        }
    }

    pub fn heap(id: ObjectId, name: impl Into<String>, size: SymbolicExpr, address: u64) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            address,
            is_heap: true,
            is_symbolic: false,
            contents: BTreeMap::new(),
            is_freed: false,
            alloc_site: None,
        }
    }

    pub fn symbolic(id: ObjectId, name: impl Into<String>, size: SymbolicExpr) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            address: 0, // Symbolic objects may not have concrete address
            is_heap: false,
            is_symbolic: true,
            contents: BTreeMap::new(),
            is_freed: false,
            alloc_site: None,
        }
    }

    /// Read value at offset
    pub fn read(&self, offset: i64) -> &SymbolicValue {
        self.contents
            .get(&offset)
            .unwrap_or(&SymbolicValue::Uninitialized)
    }

    /// Write value at offset
    pub fn write(&mut self, offset: i64, value: SymbolicValue) {
        self.contents.insert(offset, value);
    }

    /// Mark as freed
    pub fn free(&mut self) {
        self.is_freed = true;
    }

    /// Check if access is in bounds (concrete size only)
    pub fn is_in_bounds(&self, offset: i64) -> Option<bool> {
        match &self.size {
            SymbolicExpr::Concrete(size) => Some(offset >= 0 && offset < *size),
            _ => None, // Symbolic size - need solver
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Symbolic Memory State
// ═══════════════════════════════════════════════════════════════════════════

/// Symbolic memory state - KLEE-style memory model
///
/// Represents the complete memory state at a program point,
/// including path conditions that constrain symbolic values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolicMemory {
    /// Object store: id → memory object
    objects: HashMap<ObjectId, Arc<MemoryObject>>,
    /// Address space: base_address → object_id
    address_space: BTreeMap<u64, ObjectId>,
    /// Variable to address mapping
    variables: HashMap<String, Address>,
    /// Path conditions
    path_conditions: Vec<PathCondition>,
    /// Next object ID
    next_object_id: ObjectId,
    /// Next free address
    next_address: u64,
    /// Error state
    pub error: Option<MemoryError>,
}

/// Memory error types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MemoryError {
    NullDereference {
        location: String,
    },
    UseAfterFree {
        object: String,
        location: String,
    },
    DoubleFree {
        object: String,
        location: String,
    },
    BufferOverflow {
        object: String,
        offset: i64,
        size: i64,
        location: String,
    },
    InvalidPointer {
        location: String,
    },
}

impl Default for SymbolicMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolicMemory {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            address_space: BTreeMap::new(),
            variables: HashMap::new(),
            path_conditions: Vec::new(),
            next_object_id: 1,
            next_address: 0x1000, // Start allocations at 0x1000
            error: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Allocation
    // ═══════════════════════════════════════════════════════════════════════

    /// Allocate stack object (local variable)
    pub fn alloc_stack(&mut self, name: impl Into<String>, size: i64) -> Address {
        let name = name.into();
        let id = self.next_object_id;
        self.next_object_id += 1;

        let address = self.next_address;
        self.next_address += size as u64;

        let mut obj = MemoryObject::new(id, name.clone(), size, address);
        obj.is_heap = false;

        self.objects.insert(id, Arc::new(obj));
        self.address_space.insert(address, id);

        let addr = Address::Concrete(address);
        self.variables.insert(name, addr.clone());
        addr
    }

    /// Allocate heap object (malloc)
    pub fn alloc_heap(&mut self, size: SymbolicExpr) -> Address {
        let id = self.next_object_id;
        self.next_object_id += 1;

        let address = self.next_address;
        // For symbolic sizes, allocate worst-case
        let alloc_size = size.as_concrete().unwrap_or(1024) as u64;
        self.next_address += alloc_size;

        let mut obj = MemoryObject::heap(id, format!("heap_{}", id), size, address);
        obj.alloc_site = Some("malloc".to_string());

        self.objects.insert(id, Arc::new(obj));
        self.address_space.insert(address, id);

        Address::Concrete(address)
    }

    /// Create symbolic object (function argument, etc.)
    pub fn make_symbolic(&mut self, name: impl Into<String>, size: SymbolicExpr) -> Address {
        let name = name.into();
        let id = self.next_object_id;
        self.next_object_id += 1;

        let obj = MemoryObject::symbolic(id, name.clone(), size);
        self.objects.insert(id, Arc::new(obj));

        let addr = Address::Symbolic {
            base_object: id,
            offset: SymbolicExpr::concrete(0),
        };
        self.variables.insert(name, addr.clone());
        addr
    }

    /// Free heap object
    pub fn free(&mut self, addr: &Address, location: &str) -> Result<(), MemoryError> {
        match addr {
            Address::Null => {
                // free(NULL) is allowed in C
                Ok(())
            }
            Address::Concrete(base) => {
                let obj_id = self.address_space.get(base).copied().ok_or_else(|| {
                    MemoryError::InvalidPointer {
                        location: location.to_string(),
                    }
                })?;

                let obj = self
                    .objects
                    .get(&obj_id)
                    .ok_or_else(|| MemoryError::InvalidPointer {
                        location: location.to_string(),
                    })?;

                if obj.is_freed {
                    return Err(MemoryError::DoubleFree {
                        object: obj.name.clone(),
                        location: location.to_string(),
                    });
                }

                if !obj.is_heap {
                    return Err(MemoryError::InvalidPointer {
                        location: location.to_string(),
                    });
                }

                // Copy-on-write: create modified version
                let mut new_obj = obj.as_ref().clone();
                new_obj.free();
                self.objects.insert(obj_id, Arc::new(new_obj));

                Ok(())
            }
            Address::Symbolic { base_object, .. } => {
                let obj =
                    self.objects
                        .get(base_object)
                        .ok_or_else(|| MemoryError::InvalidPointer {
                            location: location.to_string(),
                        })?;

                if obj.is_freed {
                    return Err(MemoryError::DoubleFree {
                        object: obj.name.clone(),
                        location: location.to_string(),
                    });
                }

                let mut new_obj = obj.as_ref().clone();
                new_obj.free();
                self.objects.insert(*base_object, Arc::new(new_obj));

                Ok(())
            }
            Address::Invalid => Err(MemoryError::InvalidPointer {
                location: location.to_string(),
            }),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Read/Write Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Read value from address
    pub fn read(&self, addr: &Address, location: &str) -> Result<SymbolicValue, MemoryError> {
        match addr {
            Address::Null => Err(MemoryError::NullDereference {
                location: location.to_string(),
            }),
            Address::Concrete(base) => {
                let obj_id = self
                    .address_space
                    .get(base)
                    .or_else(|| {
                        // Find object containing this address
                        self.address_space
                            .range(..=*base)
                            .next_back()
                            .map(|(_, id)| id)
                    })
                    .copied()
                    .ok_or_else(|| MemoryError::InvalidPointer {
                        location: location.to_string(),
                    })?;

                let obj = self
                    .objects
                    .get(&obj_id)
                    .ok_or_else(|| MemoryError::InvalidPointer {
                        location: location.to_string(),
                    })?;

                if obj.is_freed {
                    return Err(MemoryError::UseAfterFree {
                        object: obj.name.clone(),
                        location: location.to_string(),
                    });
                }

                let offset = (*base - obj.address) as i64;

                // Check bounds
                if let Some(false) = obj.is_in_bounds(offset) {
                    let size = obj.size.as_concrete().unwrap_or(-1);
                    return Err(MemoryError::BufferOverflow {
                        object: obj.name.clone(),
                        offset,
                        size,
                        location: location.to_string(),
                    });
                }

                Ok(obj.read(offset).clone())
            }
            Address::Symbolic {
                base_object,
                offset,
            } => {
                let obj =
                    self.objects
                        .get(base_object)
                        .ok_or_else(|| MemoryError::InvalidPointer {
                            location: location.to_string(),
                        })?;

                if obj.is_freed {
                    return Err(MemoryError::UseAfterFree {
                        object: obj.name.clone(),
                        location: location.to_string(),
                    });
                }

                // For symbolic offset, return symbolic read
                match offset.as_concrete() {
                    Some(off) => Ok(obj.read(off).clone()),
                    None => {
                        // Symbolic read - need to return ITE expression
                        Ok(SymbolicValue::Symbolic(SymbolicExpr::symbol(format!(
                            "read_{}_{:?}",
                            obj.name, offset
                        ))))
                    }
                }
            }
            Address::Invalid => Err(MemoryError::InvalidPointer {
                location: location.to_string(),
            }),
        }
    }

    /// Write value to address
    pub fn write(
        &mut self,
        addr: &Address,
        value: SymbolicValue,
        location: &str,
    ) -> Result<(), MemoryError> {
        match addr {
            Address::Null => Err(MemoryError::NullDereference {
                location: location.to_string(),
            }),
            Address::Concrete(base) => {
                let obj_id = self
                    .address_space
                    .get(base)
                    .or_else(|| {
                        self.address_space
                            .range(..=*base)
                            .next_back()
                            .map(|(_, id)| id)
                    })
                    .copied()
                    .ok_or_else(|| MemoryError::InvalidPointer {
                        location: location.to_string(),
                    })?;

                let obj = self
                    .objects
                    .get(&obj_id)
                    .ok_or_else(|| MemoryError::InvalidPointer {
                        location: location.to_string(),
                    })?;

                if obj.is_freed {
                    return Err(MemoryError::UseAfterFree {
                        object: obj.name.clone(),
                        location: location.to_string(),
                    });
                }

                let offset = (*base - obj.address) as i64;

                // Check bounds
                if let Some(false) = obj.is_in_bounds(offset) {
                    let size = obj.size.as_concrete().unwrap_or(-1);
                    return Err(MemoryError::BufferOverflow {
                        object: obj.name.clone(),
                        offset,
                        size,
                        location: location.to_string(),
                    });
                }

                // Copy-on-write
                let mut new_obj = obj.as_ref().clone();
                new_obj.write(offset, value);
                self.objects.insert(obj_id, Arc::new(new_obj));

                Ok(())
            }
            Address::Symbolic {
                base_object,
                offset,
            } => {
                let obj =
                    self.objects
                        .get(base_object)
                        .ok_or_else(|| MemoryError::InvalidPointer {
                            location: location.to_string(),
                        })?;

                if obj.is_freed {
                    return Err(MemoryError::UseAfterFree {
                        object: obj.name.clone(),
                        location: location.to_string(),
                    });
                }

                // For concrete offset, write directly
                if let Some(off) = offset.as_concrete() {
                    let mut new_obj = obj.as_ref().clone();
                    new_obj.write(off, value);
                    self.objects.insert(*base_object, Arc::new(new_obj));
                }
                // For symbolic offset, we'd need to update all possible locations
                // This is handled by the constraint solver

                Ok(())
            }
            Address::Invalid => Err(MemoryError::InvalidPointer {
                location: location.to_string(),
            }),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Path Conditions
    // ═══════════════════════════════════════════════════════════════════════

    /// Add path condition
    pub fn add_constraint(&mut self, cond: PathCondition) {
        if cond != PathCondition::True {
            self.path_conditions.push(cond);
        }
    }

    /// Get all path conditions
    pub fn constraints(&self) -> &[PathCondition] {
        &self.path_conditions
    }

    /// Fork state with additional constraint
    pub fn fork_with(&self, cond: PathCondition) -> Self {
        let mut forked = self.clone();
        forked.add_constraint(cond);
        forked
    }

    // ═══════════════════════════════════════════════════════════════════════
    // State Merging (Path-Conditioned)
    // ═══════════════════════════════════════════════════════════════════════

    /// Merge two memory states with path conditions
    ///
    /// This implements path-conditioned state merging where:
    /// - State values become ITE expressions based on path conditions
    /// - Path conditions are combined with OR
    ///
    /// Example:
    /// - State A (condition: x > 0): y = 1
    /// - State B (condition: x <= 0): y = 2
    /// - Merged: y = ITE(x > 0, 1, 2)
    pub fn merge_with(&self, other: &Self) -> Self {
        let mut merged = Self::new();
        merged.next_object_id = self.next_object_id.max(other.next_object_id);
        merged.next_address = self.next_address.max(other.next_address);

        // Merge objects (take union)
        for (id, obj) in &self.objects {
            merged.objects.insert(*id, Arc::clone(obj));
        }
        for (id, obj) in &other.objects {
            if !merged.objects.contains_key(id) {
                merged.objects.insert(*id, Arc::clone(obj));
            } else {
                // Object exists in both - need to merge contents
                let self_obj = self.objects.get(id).unwrap();
                let other_obj = obj;

                // Create merged object with ITE values
                let mut new_obj = (**self_obj).clone();
                for (offset, other_val) in &other_obj.contents {
                    let self_val = self_obj.read(*offset);
                    if self_val != other_val {
                        // Values differ - create ITE
                        let merged_val = self.create_ite_value(
                            &self.path_conditions,
                            self_val,
                            &other.path_conditions,
                            other_val,
                        );
                        new_obj.write(*offset, merged_val);
                    }
                }
                new_obj.is_freed = self_obj.is_freed && other_obj.is_freed;
                merged.objects.insert(*id, Arc::new(new_obj));
            }
        }

        // Merge address space
        merged.address_space = self.address_space.clone();
        for (addr, id) in &other.address_space {
            merged.address_space.insert(*addr, *id);
        }

        // Merge variables
        merged.variables = self.variables.clone();
        for (name, addr) in &other.variables {
            merged.variables.insert(name.clone(), addr.clone());
        }

        // Combine path conditions with OR
        let self_cond = PathCondition::and(self.path_conditions.clone());
        let other_cond = PathCondition::and(other.path_conditions.clone());
        merged.path_conditions = vec![PathCondition::or(vec![self_cond, other_cond])];

        merged
    }

    /// Create ITE value from two different values under different conditions
    fn create_ite_value(
        &self,
        self_conds: &[PathCondition],
        self_val: &SymbolicValue,
        _other_conds: &[PathCondition],
        other_val: &SymbolicValue,
    ) -> SymbolicValue {
        // Extract symbolic expressions
        let self_expr = match self_val {
            SymbolicValue::ConcreteInt(i) => SymbolicExpr::concrete(*i),
            SymbolicValue::Symbolic(e) => e.clone(),
            _ => return self_val.clone(), // Can't create ITE for other types
        };

        let other_expr = match other_val {
            SymbolicValue::ConcreteInt(i) => SymbolicExpr::concrete(*i),
            SymbolicValue::Symbolic(e) => e.clone(),
            _ => return other_val.clone(),
        };

        let cond = Box::new(PathCondition::and(self_conds.to_vec()));
        SymbolicValue::Symbolic(SymbolicExpr::Ite(
            cond,
            Box::new(self_expr),
            Box::new(other_expr),
        ))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Variable Access
    // ═══════════════════════════════════════════════════════════════════════

    /// Get address of variable
    pub fn get_variable(&self, name: &str) -> Option<&Address> {
        self.variables.get(name)
    }

    /// Set variable to address
    pub fn set_variable(&mut self, name: impl Into<String>, addr: Address) {
        self.variables.insert(name.into(), addr);
    }

    /// Check if variable may be null
    pub fn may_be_null(&self, name: &str) -> bool {
        match self.variables.get(name) {
            Some(Address::Null) => true,
            Some(Address::Concrete(_)) => false,
            Some(Address::Symbolic { .. }) => true, // Conservative
            _ => true,
        }
    }

    /// Get all allocated objects
    pub fn get_objects(&self) -> impl Iterator<Item = &MemoryObject> {
        self.objects.values().map(|arc| arc.as_ref())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
