use pretty_assertions::assert_eq;
use rsc_types::{BuiltinKind, SourceField, SourceTypes};

use super::*;

fn class_for(fields: impl FnOnce(&mut SourceTypes) -> Vec<SourceField>) -> Vec<String> {
    let mut src = SourceTypes::new();
    let fields = fields(&mut src);
    let rec = src.record("Particle", fields);
    let mut pool = TypePool::default();
    let rec = pool.intern(&src, rec).unwrap();
    let mut w = JavaWriter::new();
    write_type_class(&pool, rec, TargetApi::Development, &mut w);
    w.finish()
}

fn method<'a>(lines: &'a [String], header: &str) -> Vec<&'a str> {
    let start = lines
        .iter()
        .position(|l| l.trim_start().starts_with(header))
        .unwrap();
    let indent = lines[start].len() - lines[start].trim_start().len();
    let end = lines[start..]
        .iter()
        .position(|l| l.len() == indent + 1 && l.ends_with('}'))
        .unwrap();
    lines[start..=start + end].iter().map(String::as_str).collect()
}

#[test]
fn item_class_and_element() {
    let lines = class_for(|src| {
        let int = src.builtin(BuiltinKind::Int);
        let float = src.builtin(BuiltinKind::Float);
        let float2 = src.ext_vector(float, 2);
        let arr = src.constant_array(int, 3);
        vec![
            SourceField::new("pos", float2),
            SourceField::new("ids", arr),
            SourceField::new("alive", src.builtin(BuiltinKind::Bool)),
        ]
    });
    assert_eq!(
        lines[0],
        "public class ScriptField_Particle extends android.renderscript.Script.FieldBase {"
    );
    assert_eq!(
        method(&lines, "static public class Item"),
        vec![
            "    static public class Item {",
            "        public static final int sizeof = 24;",
            "",
            "        public Float2 pos;",
            "        public int[] ids;",
            "        public boolean alive;",
            "",
            "        public Item() {",
            "            pos = new Float2();",
            "            ids = new int[3];",
            "        }",
            "",
            "    }",
        ]
    );
    assert_eq!(
        method(&lines, "public static Element createElement"),
        vec![
            "    public static Element createElement(RenderScript rs) {",
            "        Element.Builder eb = new Element.Builder(rs);",
            "        eb.add(Element.F32_2(rs), \"pos\");",
            "        eb.add(Element.I32(rs), \"ids\", 3);",
            "        eb.add(Element.BOOLEAN(rs), \"alive\");",
            "        eb.add(Element.U16(rs), \"#padding_1\");",
            "        eb.add(Element.U8(rs), \"#padding_2\");",
            "        return eb.create();",
            "    }",
        ]
    );
}

#[test]
fn field_setter_writes_at_field_offset() {
    let lines = class_for(|src| {
        let char_ = src.builtin(BuiltinKind::Char);
        let float = src.builtin(BuiltinKind::Float);
        vec![SourceField::new("tag", char_), SourceField::new("mass", float)]
    });
    assert_eq!(
        method(&lines, "public synchronized void set_mass"),
        vec![
            "    public synchronized void set_mass(int index, float v, boolean copyNow) {",
            "        if (mIOBuffer == null) mIOBuffer = new FieldPacker(Item.sizeof * getType().getX());",
            "        if (mItemArray == null) mItemArray = new Item[getType().getX()];",
            "        if (mItemArray[index] == null) mItemArray[index] = new Item();",
            "        mItemArray[index].mass = v;",
            "        if (copyNow) {",
            "            mIOBuffer.reset(index * Item.sizeof + 4);",
            "            mIOBuffer.addF32(v);",
            "            FieldPacker fp = new FieldPacker(4);",
            "            fp.addF32(v);",
            "            mAllocation.subElementData(index, 3, fp);",
            "        }",
            "    }",
        ]
    );
    assert_eq!(
        method(&lines, "private void copyToArrayLocal"),
        vec![
            "    private void copyToArrayLocal(Item i, FieldPacker fp) {",
            "        fp.addI8(i.tag);",
            "        fp.skip(3);",
            "        fp.addF32(i.mass);",
            "    }",
        ]
    );
    assert_eq!(
        method(&lines, "public synchronized byte get_tag"),
        vec![
            "    public synchronized byte get_tag(int index) {",
            "        if (mItemArray == null) return 0;",
            "        return mItemArray[index].tag;",
            "    }",
        ]
    );
}

#[test]
fn bulk_operations_are_present() {
    let lines = class_for(|src| vec![SourceField::new("n", src.builtin(BuiltinKind::Int))]);
    for header in [
        "public ScriptField_Particle(RenderScript rs, int count)",
        "public ScriptField_Particle(RenderScript rs, int count, int usages)",
        "public synchronized void set(Item i, int index, boolean copyNow)",
        "public synchronized Item get(int index)",
        "public synchronized void copyAll()",
        "public synchronized void resize(int newSize)",
    ] {
        assert!(
            lines.iter().any(|l| l.trim_start().starts_with(header)),
            "missing {header}"
        );
    }
}
