//! `ScriptC_<stem>` classes.
//!
//! The script class is the host's handle on one compiled script. Every
//! exportable gets a slot constant plus accessors or launchers that pack
//! arguments with a [`PackPlan`] and hand them to the runtime by slot.

use rsc_export::{
    ExportForEach, ExportFunc, ExportReduce, ExportVar, ForEachKind, Initializer, ScriptUnit,
};
use rsc_types::{DataType, ExportKind, TypeId, TypePool};
use rustc_hash::FxHashSet;

use crate::names::{
    element_check_name, element_expr, java_type_name, primitive_java_name, SCRIPT_CLASS_PREFIX,
};
use crate::pack::PackPlan;
use crate::writer::{Access, JavaWriter};

const SUPER_CLASS: &str = "ScriptC";
const VAR_INDEX_PREFIX: &str = "mExportVarIdx_";
const VAR_PREFIX: &str = "mExportVar_";
const FUNC_INDEX_PREFIX: &str = "mExportFuncIdx_";
const FOREACH_INDEX_PREFIX: &str = "mExportForEachIdx_";
const REDUCE_INDEX_PREFIX: &str = "mExportReduceIdx_";

pub fn class_name(unit: &ScriptUnit) -> String {
    format!("{SCRIPT_CLASS_PREFIX}{}", unit.stem())
}

/// Emit the script class of `unit` after the file prologue.
pub fn write_script_class(pool: &TypePool, unit: &ScriptUnit, w: &mut JavaWriter) {
    let name = class_name(unit);
    tracing::debug!(
        class = %name,
        vars = unit.vars().len(),
        funcs = unit.funcs().len(),
        foreach = unit.foreach().len(),
        reduce = unit.reduce().len(),
        "writing script class"
    );
    let gen = ScriptClass {
        pool,
        unit,
        checks: type_checks(pool, unit),
    };

    w.open(format!("public class {name} extends {SUPER_CLASS}"));
    gen.write_constructors(&name, w);
    for var in unit.vars() {
        gen.write_var(var, w);
    }
    for func in unit.funcs() {
        gen.write_invokable(func, w);
    }
    for kernel in unit.foreach() {
        gen.write_foreach(kernel, w);
    }
    for kernel in unit.reduce() {
        gen.write_reduce(kernel, w);
    }
    w.close();
}

struct ScriptClass<'a> {
    pool: &'a TypePool,
    unit: &'a ScriptUnit,
    /// Element types kernels check their allocations against, in first-use
    /// order.
    checks: Vec<TypeId>,
}

/// Allocation element types checked by launchers, deduplicated by name.
fn type_checks(pool: &TypePool, unit: &ScriptUnit) -> Vec<TypeId> {
    let types = unit
        .foreach()
        .iter()
        .filter(|k| k.is_launchable())
        .flat_map(|k| [k.input, k.output])
        .flatten()
        .chain(unit.reduce().iter().map(|r| r.ty));
    let mut seen = FxHashSet::default();
    types
        .filter(|&ty| seen.insert(element_check_name(pool, ty)))
        .collect()
}

fn param(ty: impl Into<String>, name: impl Into<String>) -> (String, String) {
    (ty.into(), name.into())
}

impl ScriptClass<'_> {
    fn check_var(&self, ty: TypeId) -> String {
        format!("__{}", element_check_name(self.pool, ty))
    }

    // ── Constructors ────────────────────────────────────────────

    fn write_constructors(&self, name: &str, w: &mut JavaWriter) {
        let stem = self.unit.stem();
        w.open_method(Access::Public, None, name, &[param("RenderScript", "rs")]);
        w.line("this(rs,");
        w.indent();
        w.line("rs.getApplicationContext().getResources(),");
        w.line(format!(
            "rs.getApplicationContext().getResources().getIdentifier(\"{stem}\", \"raw\","
        ));
        w.line("rs.getApplicationContext().getPackageName()));");
        w.dedent();
        w.close();

        w.open_method(
            Access::Public,
            None,
            name,
            &[
                param("RenderScript", "rs"),
                param("Resources", "resources"),
                param("int", "id"),
            ],
        );
        w.line("super(rs, resources, id);");
        for var in self.unit.vars() {
            self.write_var_init(var, w);
        }
        for &ty in &self.checks {
            w.line(format!(
                "{} = {};",
                self.check_var(ty),
                element_expr(self.pool, ty, "rs")
            ));
        }
        w.close();

        for &ty in &self.checks {
            w.line(format!("private Element {};", self.check_var(ty)));
        }
        if !self.checks.is_empty() {
            w.blank();
        }
    }

    fn write_var_init(&self, var: &ExportVar, w: &mut JavaWriter) {
        let Some(init) = &var.init else {
            return;
        };
        let target = format!("{VAR_PREFIX}{}", var.name);
        match (self.pool.get(var.ty).kind(), init) {
            (ExportKind::Primitive(p), _) => {
                if let Some(lit) = java_literal(p.data_type, init) {
                    w.line(format!("{target} = {lit};"));
                }
            }
            (ExportKind::Vector(v), Initializer::Vector(parts)) => {
                w.line(format!(
                    "{target} = new {}();",
                    java_type_name(self.pool, var.ty)
                ));
                for (part, lane) in parts.iter().zip(["x", "y", "z", "w"]) {
                    if let Some(lit) = java_literal(v.element.data_type, part) {
                        w.line(format!("{target}.{lane} = {lit};"));
                    }
                }
            }
            _ => {}
        }
    }

    // ── Variables ───────────────────────────────────────────────

    fn write_var(&self, var: &ExportVar, w: &mut JavaWriter) {
        let ty = java_type_name(self.pool, var.ty);
        let name = &var.name;
        w.line(format!(
            "private final static int {VAR_INDEX_PREFIX}{name} = {};",
            var.slot
        ));
        w.line(format!("private {ty} {VAR_PREFIX}{name};"));

        let export = self.pool.get(var.ty);
        if let Some(pointer) = export.as_pointer() {
            self.write_bind(var, &ty, pointer.pointee, w);
        } else if !var.is_const {
            self.write_set(var, &ty, w);
        }

        w.open_method(Access::Public, Some(&ty), &format!("get_{name}"), &[]);
        w.line(format!("return {VAR_PREFIX}{name};"));
        w.close();

        w.open_method(
            Access::Public,
            Some("Script.FieldID"),
            &format!("getFieldID_{name}"),
            &[],
        );
        w.line(format!("return createFieldID({VAR_INDEX_PREFIX}{name}, null);"));
        w.close();
    }

    fn write_set(&self, var: &ExportVar, ty: &str, w: &mut JavaWriter) {
        let name = &var.name;
        w.open_method(
            Access::Public,
            Some("synchronized void"),
            &format!("set_{name}"),
            &[param(ty, "v")],
        );
        if sets_directly(self.pool, var.ty) {
            w.line(format!("setVar({VAR_INDEX_PREFIX}{name}, v);"));
        } else {
            w.line(format!(
                "FieldPacker fp = new FieldPacker({});",
                self.pool.get(var.ty).alloc_size()
            ));
            PackPlan::new(self.pool, var.ty, Some("v")).render(w, "fp");
            w.line(format!("setVar({VAR_INDEX_PREFIX}{name}, fp);"));
        }
        w.line(format!("{VAR_PREFIX}{name} = v;"));
        w.close();
    }

    fn write_bind(&self, var: &ExportVar, ty: &str, pointee: TypeId, w: &mut JavaWriter) {
        let name = &var.name;
        let allocation = if self.pool.get(pointee).as_record().is_some() {
            "v.getAllocation()"
        } else {
            "v"
        };
        w.open_method(
            Access::Public,
            Some("void"),
            &format!("bind_{name}"),
            &[param(ty, "v")],
        );
        w.line(format!("{VAR_PREFIX}{name} = v;"));
        w.line(format!(
            "if (v == null) bindAllocation(null, {VAR_INDEX_PREFIX}{name});"
        ));
        w.line(format!(
            "else bindAllocation({allocation}, {VAR_INDEX_PREFIX}{name});"
        ));
        w.close();
    }

    // ── Invokables ──────────────────────────────────────────────

    fn write_invokable(&self, func: &ExportFunc, w: &mut JavaWriter) {
        let name = &func.name;
        w.line(format!(
            "private final static int {FUNC_INDEX_PREFIX}{name} = {};",
            func.slot
        ));

        w.open_method(
            Access::Public,
            Some("Script.InvokeID"),
            &format!("getInvokeID_{name}"),
            &[],
        );
        w.line(format!("return createInvokeID({FUNC_INDEX_PREFIX}{name});"));
        w.close();

        let params: Vec<_> = func
            .params
            .iter()
            .map(|(p, ty)| param(java_type_name(self.pool, *ty), p.clone()))
            .collect();
        w.open_method(Access::Public, Some("void"), &format!("invoke_{name}"), &params);
        match func.packet {
            Some(packet) => {
                let fp = format!("{name}_fp");
                w.line(format!(
                    "FieldPacker {fp} = new FieldPacker({});",
                    self.pool.get(packet).alloc_size()
                ));
                PackPlan::new(self.pool, packet, None).render(w, &fp);
                w.line(format!("invoke({FUNC_INDEX_PREFIX}{name}, {fp});"));
            }
            None => w.line(format!("invoke({FUNC_INDEX_PREFIX}{name});")),
        }
        w.close();
    }

    // ── ForEach kernels ─────────────────────────────────────────

    fn write_foreach(&self, kernel: &ExportForEach, w: &mut JavaWriter) {
        let name = &kernel.name;
        w.line(format!(
            "private final static int {FOREACH_INDEX_PREFIX}{name} = {};",
            kernel.slot
        ));
        if kernel.kind != ForEachKind::Kernel {
            w.blank();
            return;
        }

        let sig = kernel.signature;
        w.open_method(
            Access::Public,
            Some("Script.KernelID"),
            &format!("getKernelID_{name}"),
            &[],
        );
        w.line(format!(
            "return createKernelID({FOREACH_INDEX_PREFIX}{name}, {}, null, null);",
            sig.encoding()
        ));
        w.close();

        let mut params = Vec::new();
        let mut args = Vec::new();
        if sig.has_in() {
            params.push(param("Allocation", "ain"));
            args.push("ain".to_owned());
        }
        if sig.has_out() {
            params.push(param("Allocation", "aout"));
            args.push("aout".to_owned());
        }
        let usr = kernel.packet.and_then(|packet| {
            let field = self.pool.get(packet).as_record()?.fields.first()?;
            Some((packet, field.name.clone(), field.ty))
        });
        if let Some((_, usr_name, usr_ty)) = &usr {
            params.push(param(java_type_name(self.pool, *usr_ty), usr_name.clone()));
            args.push(usr_name.clone());
        }

        w.open_method(Access::Public, Some("void"), &format!("forEach_{name}"), &params);
        args.push("null".to_owned());
        w.line(format!("forEach_{name}({});", args.join(", ")));
        w.close();

        params.push(param("Script.LaunchOptions", "sc"));
        w.open_method(Access::Public, Some("void"), &format!("forEach_{name}"), &params);
        if let Some(ty) = kernel.input.filter(|_| sig.has_in()) {
            self.write_element_check("ain", ty, w);
        }
        if let Some(ty) = kernel.output.filter(|_| sig.has_out()) {
            self.write_element_check("aout", ty, w);
        }
        if sig.has_in() && sig.has_out() {
            write_dimension_check(w);
        }
        let fp = match &usr {
            Some((packet, _, _)) => {
                let fp = format!("{name}_fp");
                w.line(format!(
                    "FieldPacker {fp} = new FieldPacker({});",
                    self.pool.get(*packet).alloc_size()
                ));
                PackPlan::new(self.pool, *packet, None).render(w, &fp);
                fp
            }
            None => "null".to_owned(),
        };
        w.line(format!(
            "forEach({FOREACH_INDEX_PREFIX}{name}, {}, {}, {fp}, sc);",
            if sig.has_in() { "ain" } else { "null" },
            if sig.has_out() { "aout" } else { "null" },
        ));
        w.close();
    }

    fn write_element_check(&self, alloc: &str, ty: TypeId, w: &mut JavaWriter) {
        w.line(format!("// check {alloc}"));
        w.open(format!(
            "if (!{alloc}.getType().getElement().isCompatible({}))",
            self.check_var(ty)
        ));
        w.line(format!(
            "throw new RSRuntimeException(\"Type mismatch with {}!\");",
            element_check_name(self.pool, ty)
        ));
        w.close_tight();
    }

    // ── Reduce kernels ──────────────────────────────────────────

    fn write_reduce(&self, kernel: &ExportReduce, w: &mut JavaWriter) {
        let name = &kernel.name;
        w.line(format!(
            "private final static int {REDUCE_INDEX_PREFIX}{name} = {};",
            kernel.slot
        ));

        let mut params = vec![param("Allocation", "ain"), param("Allocation", "aout")];
        w.open_method(Access::Public, Some("void"), &format!("reduce_{name}"), &params);
        w.line(format!("reduce_{name}(ain, aout, null);"));
        w.close();

        params.push(param("Script.LaunchOptions", "sc"));
        w.open_method(Access::Public, Some("void"), &format!("reduce_{name}"), &params);
        self.write_element_check("ain", kernel.ty, w);
        self.write_element_check("aout", kernel.ty, w);
        w.line(format!("reduce({REDUCE_INDEX_PREFIX}{name}, ain, aout, sc);"));
        w.close();
    }
}

fn write_dimension_check(w: &mut JavaWriter) {
    w.line("// Verify dimensions");
    w.line("Type t0 = ain.getType();");
    w.line("Type t1 = aout.getType();");
    w.line("if ((t0.getCount() != t1.getCount()) ||");
    w.line("    (t0.getX() != t1.getX()) ||");
    w.line("    (t0.getY() != t1.getY()) ||");
    w.line("    (t0.getZ() != t1.getZ()) ||");
    w.line("    (t0.hasFaces() != t1.hasFaces()) ||");
    w.open("    (t0.hasMipmaps() != t1.hasMipmaps()))");
    w.line("throw new RSRuntimeException(\"Dimension mismatch between input and output parameters!\");");
    w.close_tight();
}

/// True if `setVar` takes the Java value as is. Everything else goes
/// through a `FieldPacker`.
fn sets_directly(pool: &TypePool, ty: TypeId) -> bool {
    match pool.get(ty).kind() {
        ExportKind::Primitive(p) => matches!(
            p.data_type,
            DataType::Float32
                | DataType::Float64
                | DataType::Signed8
                | DataType::Signed16
                | DataType::Signed32
                | DataType::Signed64
                | DataType::Boolean
        ) || p.is_object(),
        _ => false,
    }
}

/// Java literal of `init` for a variable of data type `dt`.
fn java_literal(dt: DataType, init: &Initializer) -> Option<String> {
    let java = primitive_java_name(dt);
    let lit = match init {
        Initializer::Bool(b) if dt == DataType::Boolean => b.to_string(),
        Initializer::Null if dt.is_object() => "null".to_owned(),
        Initializer::Int(i) => match java {
            "float" => format!("{i}.0f"),
            "double" => format!("{i}.0"),
            "byte" | "short" => format!("({java}) {i}"),
            "long" => format!("{i}L"),
            "int" => i.to_string(),
            _ => return None,
        },
        Initializer::Float(f) if f.is_finite() => match java {
            "float" => format!("{f:?}f"),
            "double" => format!("{f:?}"),
            _ => return None,
        },
        _ => return None,
    };
    Some(lit)
}
