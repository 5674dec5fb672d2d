//! Serialization plans for `FieldPacker`.
//!
//! A [`PackPlan`] is the sequence of packer calls that writes one value
//! of an export type at the native layout: leaf `add` calls in field order,
//! `skip` calls for alignment gaps and tail padding, and loops for arrays.
//! The same plan is rendered as Java and executed by the byte model in
//! [`crate::packer`].

use rsc_types::{ExportKind, TypeId, TypePool};

use crate::names::PackerApi;
use crate::writer::JavaWriter;

/// One packer call, or a loop of them.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PackStep {
    /// `fp.<api>(value)`, writing `lanes` consecutive lanes.
    Add {
        api: PackerApi,
        lanes: u32,
        value: String,
    },
    /// `fp.skip(n)`.
    Skip(u32),
    /// `for (int counter = 0; counter < count; counter++) { body }`.
    Repeat {
        count: u32,
        counter: String,
        body: Vec<PackStep>,
    },
}

impl PackStep {
    /// Bytes written by this step.
    pub fn size(&self) -> u64 {
        match self {
            PackStep::Add { api, lanes, .. } => u64::from(api.lane_size()) * u64::from(*lanes),
            PackStep::Skip(n) => u64::from(*n),
            PackStep::Repeat { count, body, .. } => {
                u64::from(*count) * body.iter().map(PackStep::size).sum::<u64>()
            }
        }
    }
}

/// Packer calls for one value.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct PackPlan {
    steps: Vec<PackStep>,
}

impl PackPlan {
    /// Plan the packing of `value` of type `ty`.
    ///
    /// With `value == None` the fields of a record are referred to by their
    /// bare names, which is how invokable parameters are packed.
    pub fn new(pool: &TypePool, ty: TypeId, value: Option<&str>) -> Self {
        let mut planner = Planner { pool, depth: 0 };
        let mut steps = Vec::new();
        planner.plan(ty, value, &mut steps);
        PackPlan { steps }
    }

    pub fn steps(&self) -> &[PackStep] {
        &self.steps
    }

    /// Total bytes written; equals the alloc size of the planned type.
    pub fn size(&self) -> u64 {
        self.steps.iter().map(PackStep::size).sum()
    }

    /// Emit the plan as Java statements on `packer`.
    pub fn render(&self, w: &mut JavaWriter, packer: &str) {
        render_steps(&self.steps, w, packer);
    }
}

struct Planner<'a> {
    pool: &'a TypePool,
    /// Loop nesting, used to name counters.
    depth: u32,
}

impl Planner<'_> {
    fn plan(&mut self, ty: TypeId, value: Option<&str>, out: &mut Vec<PackStep>) {
        let export = self.pool.get(ty);
        let v = value.unwrap_or("v");
        match export.kind() {
            ExportKind::Primitive(p) => out.push(PackStep::Add {
                api: PackerApi::for_data_type(p.data_type),
                lanes: p.data_type.matrix_dim().map_or(1, |dim| dim * dim),
                value: v.to_owned(),
            }),
            ExportKind::Vector(vec) => out.push(PackStep::Add {
                api: PackerApi::for_data_type(vec.element.data_type),
                lanes: vec.count,
                value: v.to_owned(),
            }),
            ExportKind::Matrix(m) => out.push(PackStep::Add {
                api: PackerApi::Matrix,
                lanes: m.dim * m.dim,
                value: v.to_owned(),
            }),
            ExportKind::Pointer(p) => {
                let api = if self.pool.abi().pointer_size == 8 {
                    PackerApi::I64
                } else {
                    PackerApi::I32
                };
                let value = if self.pool.get(p.pointee).as_record().is_some() {
                    format!("{v}.getAllocation().getPtr()")
                } else {
                    format!("{v}.getPtr()")
                };
                out.push(PackStep::Add {
                    api,
                    lanes: 1,
                    value,
                });
            }
            ExportKind::ConstantArray(a) => {
                self.depth += 1;
                let counter = format!("ct{}", self.depth);
                let element = self.pool.get(a.element);
                let mut body = Vec::new();
                self.plan(a.element, Some(&format!("{v}[{counter}]")), &mut body);
                push_skip(&mut body, element.alloc_size() - element.store_size());
                self.depth -= 1;
                out.push(PackStep::Repeat {
                    count: a.size,
                    counter,
                    body,
                });
            }
            ExportKind::Record(record) => {
                let mut pos = 0;
                for field in &record.fields {
                    let field_ty = self.pool.get(field.ty);
                    let name = match value {
                        Some(v) => format!("{v}.{}", field.name),
                        None => field.name.clone(),
                    };
                    push_skip(out, field.offset.saturating_sub(pos));
                    self.plan(field.ty, Some(&name), out);
                    push_skip(out, field_ty.alloc_size() - field_ty.store_size());
                    pos = field.offset + field_ty.alloc_size();
                }
                push_skip(out, export.alloc_size().saturating_sub(pos));
            }
        }
    }
}

fn push_skip(out: &mut Vec<PackStep>, n: u32) {
    if n > 0 {
        out.push(PackStep::Skip(n));
    }
}

fn render_steps(steps: &[PackStep], w: &mut JavaWriter, packer: &str) {
    for step in steps {
        match step {
            PackStep::Add { api, value, .. } => {
                w.line(format!("{packer}.{}({value});", api.method()));
            }
            PackStep::Skip(n) => w.line(format!("{packer}.skip({n});")),
            PackStep::Repeat {
                count,
                counter,
                body,
            } => {
                w.open(format!(
                    "for (int {counter} = 0; {counter} < {count}; {counter}++)"
                ));
                render_steps(body, w, packer);
                w.close_tight();
            }
        }
    }
}
