//! Per-unit file generation.

use std::path::Path;

use rsc_export::{Context, UnitId};

use crate::error::ReflectError;
use crate::header::{Prologue, DEFAULT_LICENSE};
use crate::names::{is_java_identifier, is_package_name};
use crate::options::ReflectOptions;
use crate::script_class::{self, write_script_class};
use crate::type_class::{self, write_type_class};
use crate::writer::JavaWriter;

/// One generated Java source file.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GeneratedFile {
    /// File name, e.g. `ScriptC_blur.java`.
    pub name: String,
    /// Java package the class lives in.
    pub package: String,
    pub lines: Vec<String>,
}

impl GeneratedFile {
    /// Path of the file relative to the output root.
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.package.replace('.', "/"), self.name)
    }

    /// The file contents, newline terminated.
    pub fn contents(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Generate the script class of unit `id` and a type class for every record
/// the unit defines first.
#[tracing::instrument(level = "debug", skip_all, fields(file = ctx.unit(id).file_name()))]
pub fn reflect(
    ctx: &Context,
    id: UnitId,
    options: &ReflectOptions,
) -> Result<Vec<GeneratedFile>, ReflectError> {
    let unit = ctx.unit(id);
    let pool = ctx.types();
    let file = unit.file_name();

    if !is_java_identifier(unit.stem()) {
        return Err(ReflectError::ClassName {
            file: file.to_owned(),
            name: unit.stem().to_owned(),
        });
    }
    let package = options
        .package_name
        .as_deref()
        .or_else(|| unit.package_name())
        .ok_or_else(|| ReflectError::MissingPackage {
            file: file.to_owned(),
        })?;
    if !is_package_name(package) {
        return Err(ReflectError::PackageName {
            file: file.to_owned(),
            package: package.to_owned(),
        });
    }

    let prologue = Prologue {
        license: options
            .license_note
            .as_deref()
            .or_else(|| unit.license())
            .unwrap_or(DEFAULT_LICENSE),
        source_file: Path::new(file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file),
        package,
        rs_package: &options.rs_package_name,
    };
    let emit = |name: String, body: &dyn Fn(&mut JavaWriter)| {
        let mut w = JavaWriter::new();
        prologue.write(&mut w);
        body(&mut w);
        tracing::debug!(file = %name, "generated");
        GeneratedFile {
            name: format!("{name}.java"),
            package: package.to_owned(),
            lines: w.finish(),
        }
    };

    let api = ctx.target_api();
    let mut files = vec![emit(script_class::class_name(unit), &|w| {
        write_script_class(pool, unit, w);
    })];
    for ty in pool.records_defined_in(file) {
        files.push(emit(type_class::class_name(pool, ty), &|w| {
            write_type_class(pool, ty, api, w);
        }));
    }
    Ok(files)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
