//! The reflection context.
//!
//! One [`Context`] spans a whole reflection run. It owns the [`TypePool`]
//! (and with it the ODR registry) and one [`ScriptUnit`] per processed file.
//! Files must be fed in a fixed order: slot numbers and ODR diagnostics
//! depend on it.
//!
//! Failures of a single declaration are reported to the sink and only drop
//! that declaration. An ODR violation aborts the run with [`RunAborted`].

use std::path::Path;

use rsc_diagnostic::{DiagnosticSink, Location};
use rsc_types::{Abi, BuiltinKind, TypeError, TypeId, TypePool};
use rustc_hash::FxHashSet;

use crate::decl::{FuncDecl, ParamDecl, Position, Pragmas, Storage, TranslationUnit, VarDecl};
use crate::error::{ExportError, KernelError, RunAborted};
use crate::exportable::{
    ExportForEach, ExportFunc, ExportReduce, ExportVar, Exportable, ForEachKind,
};
use crate::kernel::{self, ForEachShape, KernelClass, ReduceShape, ROOT};
use crate::signature::ForEachSignature;
use crate::target::TargetApi;

/// Prefix of the record that carries a kernel's user data argument.
pub const FOREACH_PACKET_PREFIX: &str = ".rs.helper_foreach_param:";
/// Prefix of the record that carries an invokable's arguments.
pub const INVOKE_PACKET_PREFIX: &str = ".rs.helper_invoke_param:";

/// Index of a processed file within a [`Context`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct UnitId(u32);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Everything exported from one source file.
#[derive(Clone, Debug, Default)]
pub struct ScriptUnit {
    file_name: String,
    package_name: Option<String>,
    license: Option<String>,
    vars: Vec<ExportVar>,
    funcs: Vec<ExportFunc>,
    foreach: Vec<ExportForEach>,
    reduce: Vec<ExportReduce>,
    forced_types: Vec<TypeId>,
}

impl ScriptUnit {
    fn new(file_name: &str, pragmas: &Pragmas) -> Self {
        ScriptUnit {
            file_name: file_name.to_owned(),
            package_name: pragmas.java_package_name.clone(),
            license: pragmas.license.clone(),
            ..Self::default()
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name without directory and extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Package requested by `#pragma rs java_package_name`.
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// License text requested by `#pragma rs license`.
    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn vars(&self) -> &[ExportVar] {
        &self.vars
    }

    pub fn funcs(&self) -> &[ExportFunc] {
        &self.funcs
    }

    /// ForEach slots in slot order; slot 0 is `root` or a placeholder.
    pub fn foreach(&self) -> &[ExportForEach] {
        &self.foreach
    }

    pub fn reduce(&self) -> &[ExportReduce] {
        &self.reduce
    }

    /// Types named by `#pragma rs export_type`.
    pub fn forced_types(&self) -> &[TypeId] {
        &self.forced_types
    }

    pub fn var(&self, name: &str) -> Option<&ExportVar> {
        self.vars.iter().find(|v| v.name == name)
    }

    pub fn func(&self, name: &str) -> Option<&ExportFunc> {
        self.funcs.iter().find(|f| f.name == name)
    }

    pub fn kernel(&self, name: &str) -> Option<&ExportForEach> {
        self.foreach.iter().find(|k| k.name == name)
    }

    /// All exportables: variables, functions, ForEach slots, then reduce
    /// kernels.
    pub fn exportables(&self) -> impl Iterator<Item = Exportable<'_>> {
        self.vars
            .iter()
            .map(Exportable::Var)
            .chain(self.funcs.iter().map(Exportable::Func))
            .chain(self.foreach.iter().map(Exportable::ForEach))
            .chain(self.reduce.iter().map(Exportable::Reduce))
    }

    /// True if nothing at all was exported.
    pub fn is_empty(&self) -> bool {
        self.exportables().next().is_none() && self.forced_types.is_empty()
    }
}

/// State of one reflection run.
#[derive(Debug, Default)]
pub struct Context {
    pool: TypePool,
    units: Vec<ScriptUnit>,
    target_api: TargetApi,
}

impl Context {
    pub fn new(target_api: TargetApi, abi: Abi) -> Self {
        Context {
            pool: TypePool::new(abi),
            units: Vec::new(),
            target_api,
        }
    }

    pub fn target_api(&self) -> TargetApi {
        self.target_api
    }

    pub fn types(&self) -> &TypePool {
        &self.pool
    }

    pub fn units(&self) -> &[ScriptUnit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> &ScriptUnit {
        &self.units[id.index()]
    }

    /// Classify and export every declaration of `tu`.
    ///
    /// Per-declaration failures go to `sink`; the unit is still recorded.
    /// An ODR violation is reported as well and then returned, after which
    /// the context must not be fed further units.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %tu.file_name))]
    pub fn process_unit(
        &mut self,
        tu: &TranslationUnit,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<UnitId, RunAborted> {
        self.pool.begin_file(tu.file_name.as_str());
        let mut exporter = Exporter {
            pool: &mut self.pool,
            tu,
            sink,
            api: self.target_api,
            policy: ExportPolicy::new(&tu.pragmas),
            unit: ScriptUnit::new(&tu.file_name, &tu.pragmas),
        };
        exporter.check_pragmas();
        exporter.export_vars()?;
        exporter.export_funcs()?;
        exporter.export_types()?;
        let unit = exporter.finish();

        tracing::debug!(
            vars = unit.vars.len(),
            funcs = unit.funcs.len(),
            foreach = unit.foreach.len(),
            reduce = unit.reduce.len(),
            "unit exported"
        );
        let id = UnitId(next_slot(&self.units));
        self.units.push(unit);
        Ok(id)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot counts are bounded by the declarations of one file"
)]
fn next_slot<T>(items: &[T]) -> u32 {
    items.len() as u32
}

/// Which globals a unit exports.
///
/// Explicit `export_var`/`export_func` lists restrict the export to the
/// listed names unless the matching `*_all` pragma is also present.
struct ExportPolicy<'a> {
    vars: Option<FxHashSet<&'a str>>,
    funcs: Option<FxHashSet<&'a str>>,
}

impl<'a> ExportPolicy<'a> {
    fn new(pragmas: &'a Pragmas) -> Self {
        let listed = |names: &'a [String], all: bool| -> Option<FxHashSet<&'a str>> {
            (!all && !names.is_empty()).then(|| names.iter().map(String::as_str).collect())
        };
        ExportPolicy {
            vars: listed(&pragmas.export_vars, pragmas.export_var_all),
            funcs: listed(&pragmas.export_funcs, pragmas.export_func_all),
        }
    }

    fn exports_var(&self, var: &VarDecl) -> bool {
        var.storage != Storage::Static
            && self
                .vars
                .as_ref()
                .is_none_or(|names| names.contains(var.name.as_str()))
    }

    fn exports_func(&self, name: &str) -> bool {
        self.funcs.as_ref().is_none_or(|names| names.contains(name))
    }
}

/// Working state while exporting one unit.
struct Exporter<'a> {
    pool: &'a mut TypePool,
    tu: &'a TranslationUnit,
    sink: &'a mut dyn DiagnosticSink,
    api: TargetApi,
    policy: ExportPolicy<'a>,
    unit: ScriptUnit,
}

impl Exporter<'_> {
    fn location(&self, pos: Position) -> Location {
        if pos.line == 0 {
            Location::file(self.tu.file_name.as_str())
        } else {
            Location::new(self.tu.file_name.as_str(), pos.line, pos.column)
        }
    }

    fn report(&mut self, err: &ExportError, pos: Position) {
        let diag = err.to_diagnostic(self.location(pos));
        self.sink.report(diag);
    }

    /// Split ODR violations off an interning result. They are reported here
    /// and end the run; any other outcome is handed back.
    fn fatal(
        &mut self,
        result: Result<TypeId, TypeError>,
        pos: Position,
    ) -> Result<Result<TypeId, TypeError>, RunAborted> {
        match result {
            Err(TypeError::Odr(violation)) => {
                tracing::debug!(name = %violation.name, "ODR violation, aborting run");
                let diag = TypeError::Odr(violation.clone())
                    .to_diagnostic()
                    .with_location(self.location(pos));
                self.sink.report(diag);
                Err(RunAborted { violation })
            }
            other => Ok(other),
        }
    }

    /// Warn about pragma names with no declaration behind them.
    fn check_pragmas(&mut self) {
        let tu = self.tu;
        for name in &tu.pragmas.export_vars {
            if tu.var(name).is_none() {
                let err = ExportError::MissingSymbol {
                    pragma: "export_var",
                    name: name.clone(),
                };
                self.report(&err, Position::default());
            }
        }
        for name in &tu.pragmas.export_funcs {
            if tu.func(name).is_none() {
                let err = ExportError::MissingSymbol {
                    pragma: "export_func",
                    name: name.clone(),
                };
                self.report(&err, Position::default());
            }
        }
    }

    fn export_vars(&mut self) -> Result<(), RunAborted> {
        let tu = self.tu;
        for var in &tu.vars {
            if !self.policy.exports_var(var) {
                continue;
            }
            let result = self.pool.intern_decl(&tu.types, var.ty);
            match self.fatal(result, var.pos)? {
                Ok(ty) => {
                    let slot = next_slot(&self.unit.vars);
                    tracing::debug!(var = %var.name, slot, ty = %self.pool.name(ty), "exported variable");
                    self.unit.vars.push(ExportVar {
                        name: var.name.clone(),
                        ty,
                        slot,
                        is_const: tu.types.is_const(var.ty),
                        init: var.init.clone(),
                        pos: var.pos,
                    });
                }
                Err(source) => {
                    let err = ExportError::VarType {
                        name: var.name.clone(),
                        source,
                    };
                    self.report(&err, var.pos);
                }
            }
        }
        Ok(())
    }

    fn export_funcs(&mut self) -> Result<(), RunAborted> {
        let tu = self.tu;
        for func in &tu.funcs {
            if func.storage == Storage::Static {
                continue;
            }
            if !func.is_definition {
                let defined = tu
                    .funcs
                    .iter()
                    .any(|f| f.is_definition && f.name == func.name);
                if !defined && self.policy.funcs.is_some() && self.policy.exports_func(&func.name)
                {
                    let err = ExportError::Undefined {
                        name: func.name.clone(),
                    };
                    self.report(&err, func.pos);
                }
                continue;
            }

            match kernel::classify(func, &tu.types, self.api) {
                Err(errors) => {
                    for err in errors {
                        self.report(&ExportError::Kernel(err), func.pos);
                    }
                }
                Ok(KernelClass::Init | KernelClass::Dtor) => {}
                Ok(KernelClass::GraphicsRoot) => self.unit.foreach.push(ExportForEach {
                    name: func.name.clone(),
                    slot: 0,
                    kind: ForEachKind::GraphicsRoot,
                    signature: ForEachSignature::empty(),
                    input: None,
                    output: None,
                    packet: None,
                    pos: func.pos,
                }),
                Ok(KernelClass::ForEach(shape)) => self.export_foreach(func, &shape)?,
                Ok(KernelClass::Reduce(shape)) => self.export_reduce(func, shape)?,
                Ok(KernelClass::Invokable) => {
                    if self.policy.exports_func(&func.name) {
                        self.export_invokable(func)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Element type of an allocation parameter. `void *` allocations are
    /// untyped.
    ///
    /// An element type that cannot be exported is reported and yields
    /// `Err(())`: the kernel is then left out.
    fn allocation_element(
        &mut self,
        func: &FuncDecl,
        param: &ParamDecl,
    ) -> Result<Result<Option<TypeId>, ()>, RunAborted> {
        let tu = self.tu;
        let Some(pointee) = tu.types.pointee(param.ty) else {
            return Ok(Ok(None));
        };
        if tu.types.builtin_kind(pointee) == Some(BuiltinKind::Void) {
            return Ok(Ok(None));
        }
        let result = self.pool.intern(&tu.types, pointee);
        match self.fatal(result, param.pos)? {
            Ok(ty) => Ok(Ok(Some(ty))),
            Err(source) => {
                let err = ExportError::ParamType {
                    func: func.name.clone(),
                    param: param.name.clone(),
                    source,
                };
                self.report(&err, param.pos);
                Ok(Err(()))
            }
        }
    }

    fn export_foreach(&mut self, func: &FuncDecl, shape: &ForEachShape) -> Result<(), RunAborted> {
        let mut elements = [None, None];
        for (slot, index) in elements.iter_mut().zip([shape.input, shape.output]) {
            let Some(i) = index else { continue };
            match self.allocation_element(func, &func.params[i])? {
                Ok(ty) => *slot = ty,
                Err(()) => return Ok(()),
            }
        }
        let [input, output] = elements;
        let packet = match shape.usr_data {
            Some(i) => match self.usr_data_packet(func, &func.params[i])? {
                Ok(packet) => packet,
                Err(err) => {
                    self.report(&ExportError::Kernel(err), func.params[i].pos);
                    return Ok(());
                }
            },
            None => None,
        };

        tracing::debug!(
            kernel = %func.name,
            signature = shape.signature.encoding(),
            "exported foreach kernel"
        );
        self.unit.foreach.push(ExportForEach {
            name: func.name.clone(),
            slot: 0,
            kind: ForEachKind::Kernel,
            signature: shape.signature,
            input,
            output,
            packet,
            pos: func.pos,
        });
        Ok(())
    }

    /// Wrap the user data pointee into an artificial single-field record.
    /// `const void *` user data has no packet.
    fn usr_data_packet(
        &mut self,
        func: &FuncDecl,
        param: &ParamDecl,
    ) -> Result<Result<Option<TypeId>, KernelError>, RunAborted> {
        let tu = self.tu;
        let unsupported = || KernelError::UsrDataType {
            func: func.name.clone(),
            param: param.name.clone(),
        };
        let Some(pointee) = tu.types.pointee(param.ty) else {
            return Ok(Err(unsupported()));
        };
        if tu.types.builtin_kind(pointee) == Some(BuiltinKind::Void) {
            return Ok(Ok(None));
        }
        let result = self.pool.intern_decl(&tu.types, pointee);
        let Ok(ty) = self.fatal(result, param.pos)? else {
            return Ok(Err(unsupported()));
        };
        let packet = self.pool.intern_artificial_record(
            format!("{FOREACH_PACKET_PREFIX}{}", func.name),
            vec![(param.name.clone(), ty)],
        );
        Ok(packet.map(Some).map_err(|_| unsupported()))
    }

    fn export_reduce(&mut self, func: &FuncDecl, shape: ReduceShape) -> Result<(), RunAborted> {
        let tu = self.tu;
        let result = self.pool.intern(&tu.types, shape.ty);
        match self.fatal(result, func.pos)? {
            Ok(ty) => {
                let slot = next_slot(&self.unit.reduce);
                tracing::debug!(kernel = %func.name, slot, "exported reduce kernel");
                self.unit.reduce.push(ExportReduce {
                    name: func.name.clone(),
                    slot,
                    ty,
                    pos: func.pos,
                });
            }
            Err(source) => {
                let err = ExportError::ReduceType {
                    func: func.name.clone(),
                    source,
                };
                self.report(&err, func.pos);
            }
        }
        Ok(())
    }

    fn export_invokable(&mut self, func: &FuncDecl) -> Result<(), RunAborted> {
        let tu = self.tu;
        let mut params = Vec::with_capacity(func.params.len());
        let mut failed = false;
        for param in &func.params {
            let result = self.pool.intern_decl(&tu.types, param.ty);
            match self.fatal(result, param.pos)? {
                Ok(ty) => params.push((param.name.clone(), ty)),
                Err(source) => {
                    let err = ExportError::ParamType {
                        func: func.name.clone(),
                        param: param.name.clone(),
                        source,
                    };
                    self.report(&err, param.pos);
                    failed = true;
                }
            }
        }
        if failed {
            return Ok(());
        }

        let packet = if params.is_empty() {
            None
        } else {
            let name = format!("{INVOKE_PACKET_PREFIX}{}", func.name);
            match self.pool.intern_artificial_record(name, params.clone()) {
                Ok(packet) => Some(packet),
                Err(source) => {
                    let err = ExportError::PacketLayout {
                        func: func.name.clone(),
                        source,
                    };
                    self.report(&err, func.pos);
                    return Ok(());
                }
            }
        };

        let slot = next_slot(&self.unit.funcs);
        tracing::debug!(func = %func.name, slot, "exported invokable");
        self.unit.funcs.push(ExportFunc {
            name: func.name.clone(),
            slot,
            params,
            packet,
            pos: func.pos,
        });
        Ok(())
    }

    fn export_types(&mut self) -> Result<(), RunAborted> {
        let tu = self.tu;
        for name in &tu.pragmas.export_types {
            let Some(ty) = tu.type_decl(name) else {
                let err = ExportError::MissingSymbol {
                    pragma: "export_type",
                    name: name.clone(),
                };
                self.report(&err, Position::default());
                continue;
            };
            let result = self.pool.intern(&tu.types, ty);
            match self.fatal(result, Position::default())? {
                Ok(id) => {
                    if !self.unit.forced_types.contains(&id) {
                        self.unit.forced_types.push(id);
                    }
                }
                Err(source) => {
                    let err = ExportError::ForcedType {
                        name: name.clone(),
                        source,
                    };
                    self.report(&err, Position::default());
                }
            }
        }
        Ok(())
    }

    /// Number the ForEach slots: `root` first, then the rest in discovery
    /// order. Without a `root`, slot 0 is a placeholder.
    fn finish(mut self) -> ScriptUnit {
        let foreach = &mut self.unit.foreach;
        match foreach.iter().position(|k| k.name == ROOT) {
            Some(index) => {
                let root = foreach.remove(index);
                foreach.insert(0, root);
            }
            None if !foreach.is_empty() => foreach.insert(
                0,
                ExportForEach {
                    name: ROOT.to_owned(),
                    slot: 0,
                    kind: ForEachKind::Placeholder,
                    signature: ForEachSignature::empty(),
                    input: None,
                    output: None,
                    packet: None,
                    pos: Position::default(),
                },
            ),
            None => {}
        }
        for (slot, kernel) in (0u32..).zip(foreach.iter_mut()) {
            kernel.slot = slot;
        }
        self.unit
    }
}
