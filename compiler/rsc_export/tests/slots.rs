//! Property tests for ForEach slot numbering.
//!
//! Random files declare a handful of kernels, optionally including `root`
//! at a random position. The tests check that:
//! 1. `root` always holds slot 0, or a placeholder does when it is missing
//! 2. The remaining kernels get slots 1..N in declaration order
//! 3. A signature bit is set iff the matching parameter is present

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use rsc_diagnostic::{DiagnosticConfig, DiagnosticQueue};
use rsc_export::{
    Context, ForEachKind, FuncDecl, KernelAttr, ParamDecl, TranslationUnit,
};
use rsc_types::BuiltinKind;

/// Optional parameters of one generated kernel.
#[derive(Clone, Debug)]
struct Shape {
    input: bool,
    x: bool,
    y: bool,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(input, x, y)| Shape { input, x, y })
}

fn kernels_strategy() -> impl Strategy<Value = (Vec<(String, Shape)>, Option<usize>)> {
    prop::collection::btree_set("k[a-z]{1,5}", 0..6)
        .prop_flat_map(|names| {
            let count = names.len();
            let shapes = prop::collection::vec(shape_strategy(), count + 1);
            let root = prop::option::of(0..=count);
            (Just(names.into_iter().collect::<Vec<_>>()), shapes, root)
        })
        .prop_map(|(names, mut shapes, root)| {
            let root_shape = shapes.pop().unwrap();
            let mut kernels: Vec<_> = names.into_iter().zip(shapes).collect();
            if let Some(at) = root {
                kernels.insert(at, ("root".to_owned(), root_shape));
            }
            (kernels, root)
        })
}

fn build(kernels: &[(String, Shape)]) -> TranslationUnit {
    let mut tu = TranslationUnit::new("slots.rs");
    let src = &mut tu.types;
    let void = src.builtin(BuiltinKind::Void);
    let uint = src.builtin(BuiltinKind::UInt);
    let int = src.builtin(BuiltinKind::Int);
    let const_int = src.constant(int);
    let in_ptr = src.pointer(const_int);
    let out_ptr = src.pointer(int);

    for (name, shape) in kernels {
        let mut params = Vec::new();
        if shape.input {
            params.push(ParamDecl::new("in", in_ptr));
        }
        params.push(ParamDecl::new("out", out_ptr));
        if shape.x {
            params.push(ParamDecl::new("x", uint));
        }
        if shape.y {
            params.push(ParamDecl::new("y", uint));
        }
        tu.funcs
            .push(FuncDecl::new(name.as_str(), params, void).with_kernel(KernelAttr::ForEach));
    }
    tu
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

    #[test]
    fn root_first_then_declaration_order((kernels, root) in kernels_strategy()) {
        let tu = build(&kernels);
        let mut ctx = Context::default();
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        let id = ctx.process_unit(&tu, &mut queue).unwrap();
        prop_assert_eq!(queue.error_count(), 0);

        let slots = ctx.unit(id).foreach();
        if kernels.is_empty() {
            prop_assert!(slots.is_empty());
            return Ok(());
        }

        prop_assert_eq!(slots[0].name.as_str(), "root");
        let expected_kind = if root.is_some() { ForEachKind::Kernel } else { ForEachKind::Placeholder };
        prop_assert_eq!(slots[0].kind, expected_kind);

        let others: Vec<_> = kernels.iter().filter(|(n, _)| n != "root").map(|(n, _)| n.as_str()).collect();
        let numbered: Vec<_> = slots[1..].iter().map(|k| k.name.as_str()).collect();
        prop_assert_eq!(numbered, others);
        for (i, slot) in slots.iter().enumerate() {
            prop_assert_eq!(slot.slot as usize, i);
        }
    }

    #[test]
    fn signature_bits_match_parameters((kernels, _root) in kernels_strategy()) {
        let tu = build(&kernels);
        let mut ctx = Context::default();
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        let id = ctx.process_unit(&tu, &mut queue).unwrap();
        let unit = ctx.unit(id);

        for (name, shape) in &kernels {
            let kernel = unit.kernel(name).unwrap();
            let sig = kernel.signature;
            prop_assert_eq!(sig.has_in(), shape.input);
            prop_assert!(sig.has_out());
            prop_assert!(!sig.has_usr_data());
            prop_assert_eq!(sig.has_x(), shape.x);
            prop_assert_eq!(sig.has_y(), shape.y);
        }
    }
}
