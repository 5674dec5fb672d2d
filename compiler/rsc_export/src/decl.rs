//! Declarations handed over by the front end for one source file.
//!
//! The parser and semantic analyzer are external. They resolve every global
//! variable, function and pragma of a file into a [`TranslationUnit`]; the
//! export passes never look at source text.

use rsc_types::{SourceTypeId, SourceTypes};

/// Line and column of a declaration, 1-based. Line 0 means unknown.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Linkage of a global declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Storage {
    #[default]
    External,
    Static,
}

/// Constant initializer of a global variable.
#[derive(Clone, PartialEq, Debug)]
pub enum Initializer {
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Component-wise vector initializer.
    Vector(Vec<Initializer>),
    /// Null pointer or object handle.
    Null,
}

/// A global variable.
#[derive(Clone, PartialEq, Debug)]
pub struct VarDecl {
    pub name: String,
    pub ty: SourceTypeId,
    pub storage: Storage,
    pub init: Option<Initializer>,
    pub pos: Position,
}

impl VarDecl {
    pub fn new(name: impl Into<String>, ty: SourceTypeId) -> Self {
        VarDecl {
            name: name.into(),
            ty,
            storage: Storage::External,
            init: None,
            pos: Position::default(),
        }
    }

    #[must_use]
    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }

    #[must_use]
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    #[must_use]
    pub fn at(mut self, pos: Position) -> Self {
        self.pos = pos;
        self
    }
}

/// Kernel attribute on a function (`__attribute__((kernel))`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum KernelAttr {
    ForEach,
    /// `kernel("reduce")`
    Reduce,
}

/// One function parameter.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParamDecl {
    pub name: String,
    pub ty: SourceTypeId,
    pub pos: Position,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: SourceTypeId) -> Self {
        ParamDecl {
            name: name.into(),
            ty,
            pos: Position::default(),
        }
    }
}

/// A global function declaration or definition.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub ret: SourceTypeId,
    pub kernel: Option<KernelAttr>,
    /// False for prototypes without a body.
    pub is_definition: bool,
    pub storage: Storage,
    pub pos: Position,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>, params: Vec<ParamDecl>, ret: SourceTypeId) -> Self {
        FuncDecl {
            name: name.into(),
            params,
            ret,
            kernel: None,
            is_definition: true,
            storage: Storage::External,
            pos: Position::default(),
        }
    }

    #[must_use]
    pub fn with_kernel(mut self, kernel: KernelAttr) -> Self {
        self.kernel = Some(kernel);
        self
    }

    #[must_use]
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    /// Mark as a prototype without a body.
    #[must_use]
    pub fn declaration_only(mut self) -> Self {
        self.is_definition = false;
        self
    }

    #[must_use]
    pub fn at(mut self, pos: Position) -> Self {
        self.pos = pos;
        self
    }
}

/// `#pragma rs ...` settings recorded for a file.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Pragmas {
    pub java_package_name: Option<String>,
    pub license: Option<String>,
    pub export_vars: Vec<String>,
    pub export_funcs: Vec<String>,
    pub export_types: Vec<String>,
    pub export_var_all: bool,
    pub export_func_all: bool,
}

/// Everything the front end resolved for one source file.
#[derive(Clone, Debug, Default)]
pub struct TranslationUnit {
    /// Path of the source file as given to the compiler.
    pub file_name: String,
    pub types: SourceTypes,
    pub vars: Vec<VarDecl>,
    pub funcs: Vec<FuncDecl>,
    /// Named types declared in the file, for `export_type` lookup.
    pub type_decls: Vec<(String, SourceTypeId)>,
    pub pragmas: Pragmas,
}

impl TranslationUnit {
    pub fn new(file_name: impl Into<String>) -> Self {
        TranslationUnit {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn var(&self, name: &str) -> Option<&VarDecl> {
        self.vars.iter().find(|v| v.name == name)
    }

    pub fn func(&self, name: &str) -> Option<&FuncDecl> {
        self.funcs.iter().find(|f| f.name == name)
    }

    pub fn type_decl(&self, name: &str) -> Option<SourceTypeId> {
        self.type_decls
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, ty)| ty)
    }
}
