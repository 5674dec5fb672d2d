//! File prologue shared by every generated class.

use crate::writer::JavaWriter;

/// License put at the top of generated files when neither the options nor
/// the script supply one.
pub const DEFAULT_LICENSE: &str = "\
Copyright (C) 2011-2014 The Android Open Source Project

Licensed under the Apache License, Version 2.0 (the \"License\");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

     http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an \"AS IS\" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.";

/// What goes above the class declaration.
#[derive(Copy, Clone, Debug)]
pub struct Prologue<'a> {
    pub license: &'a str,
    /// Source file name without directories.
    pub source_file: &'a str,
    pub package: &'a str,
    pub rs_package: &'a str,
}

impl Prologue<'_> {
    pub fn write(&self, w: &mut JavaWriter) {
        write_block_comment(w, self.license);
        w.blank();
        w.line("/*");
        w.line(" * This file is auto-generated. DO NOT MODIFY!");
        w.line(format!(" * The source Renderscript file: {}", self.source_file));
        w.line(" */");
        w.blank();
        w.line(format!("package {};", self.package));
        w.blank();
        w.line(format!("import {}.*;", self.rs_package));
        w.line("import android.content.res.Resources;");
        w.line("import android.util.Log;");
        w.blank();
        w.line("/**");
        w.line(" * @hide");
        w.line(" */");
    }
}

/// Emit `text` as a `/* ... */` comment. Text that already is a block
/// comment is copied as is.
fn write_block_comment(w: &mut JavaWriter, text: &str) {
    let text = text.trim_end();
    if text.trim_start().starts_with("/*") {
        for line in text.lines() {
            w.line(line);
        }
        return;
    }
    w.line("/*");
    for line in text.lines() {
        if line.is_empty() {
            w.line(" *");
        } else {
            w.line(format!(" * {line}"));
        }
    }
    w.line(" */");
}
