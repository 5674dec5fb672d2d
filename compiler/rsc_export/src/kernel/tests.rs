use pretty_assertions::assert_eq;

use super::*;
use crate::decl::ParamDecl;

/// Front-end types shared by the tests.
struct Types {
    src: SourceTypes,
    void: SourceTypeId,
    int: SourceTypeId,
    uint: SourceTypeId,
    float: SourceTypeId,
    in_ptr: SourceTypeId,
    out_ptr: SourceTypeId,
    const_void_ptr: SourceTypeId,
}

fn types() -> Types {
    let mut src = SourceTypes::new();
    let void = src.builtin(BuiltinKind::Void);
    let int = src.builtin(BuiltinKind::Int);
    let uint = src.builtin(BuiltinKind::UInt);
    let float = src.builtin(BuiltinKind::Float);
    let uchar = src.builtin(BuiltinKind::UChar);
    let vec4 = src.ext_vector(uchar, 4);
    let uchar4 = src.typedef("uchar4", vec4);
    let const_uchar4 = src.constant(uchar4);
    let in_ptr = src.pointer(const_uchar4);
    let out_ptr = src.pointer(uchar4);
    let const_void = src.constant(void);
    let const_void_ptr = src.pointer(const_void);
    Types {
        src,
        void,
        int,
        uint,
        float,
        in_ptr,
        out_ptr,
        const_void_ptr,
    }
}

fn func(name: &str, params: &[(&str, SourceTypeId)], ret: SourceTypeId) -> FuncDecl {
    let params = params
        .iter()
        .map(|&(n, ty)| ParamDecl::new(n, ty))
        .collect();
    FuncDecl::new(name, params, ret)
}

fn classify_dev(t: &Types, f: &FuncDecl) -> Result<KernelClass, KernelErrors> {
    classify(f, &t.src, TargetApi::Development)
}

fn foreach_bits(class: &KernelClass) -> u32 {
    match class {
        KernelClass::ForEach(shape) => shape.signature.encoding(),
        other => panic!("expected a foreach kernel, got {other:?}"),
    }
}

fn single_error(result: Result<KernelClass, KernelErrors>) -> KernelError {
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1, "{errors:?}");
    errors.into_iter().next().unwrap()
}

// ── Special functions ──────────────────────────────────────────

#[test]
fn graphics_root_returns_int() {
    let t = types();
    let f = func("root", &[], t.int);
    assert_eq!(classify_dev(&t, &f).unwrap(), KernelClass::GraphicsRoot);

    let bad = func("root", &[], t.void);
    assert_eq!(single_error(classify_dev(&t, &bad)), KernelError::GraphicsRootReturn);
}

#[test]
fn compute_root_is_a_foreach_kernel() {
    let t = types();
    let f = func("root", &[("in", t.in_ptr), ("out", t.out_ptr)], t.void);
    assert_eq!(foreach_bits(&classify_dev(&t, &f).unwrap()), 0b00011);
}

#[test]
fn init_and_dtor_take_nothing_and_return_void() {
    let t = types();
    assert_eq!(classify_dev(&t, &func("init", &[], t.void)).unwrap(), KernelClass::Init);
    assert_eq!(classify_dev(&t, &func(DTOR, &[], t.void)).unwrap(), KernelClass::Dtor);

    let bad = func("init", &[("a", t.int)], t.int);
    let errors = classify_dev(&t, &bad).unwrap_err();
    assert_eq!(
        errors.into_vec(),
        vec![
            KernelError::SpecialParams { func: "init".into() },
            KernelError::SpecialReturn { func: "init".into() },
        ]
    );
}

// ── ForEach parameter scan ─────────────────────────────────────

#[test]
fn full_signature_sets_every_bit() {
    let t = types();
    let f = func(
        "k",
        &[
            ("in", t.in_ptr),
            ("out", t.out_ptr),
            ("data", t.const_void_ptr),
            ("x", t.uint),
            ("y", t.uint),
        ],
        t.void,
    )
    .with_kernel(KernelAttr::ForEach);
    let class = classify_dev(&t, &f).unwrap();
    let KernelClass::ForEach(shape) = class else {
        panic!("expected foreach");
    };
    assert_eq!(shape.signature, ForEachSignature::all());
    assert_eq!(shape.usr_data, Some(2));
    assert_eq!((shape.x, shape.y), (Some(3), Some(4)));
}

#[test]
fn output_only_kernel() {
    let t = types();
    let f = func("fill", &[("out", t.out_ptr), ("x", t.uint)], t.void);
    assert_eq!(foreach_bits(&classify_dev(&t, &f).unwrap()), 0b01010);
}

#[test]
fn unnamed_coordinates_fill_x_then_y() {
    let t = types();
    let f = func("k", &[("in", t.in_ptr), ("i", t.uint), ("j", t.uint)], t.void);
    let KernelClass::ForEach(shape) = classify_dev(&t, &f).unwrap() else {
        panic!("expected foreach");
    };
    assert_eq!((shape.x, shape.y), (Some(1), Some(2)));
}

#[test]
fn y_before_x_is_out_of_order() {
    let t = types();
    let f = func("k", &[("in", t.in_ptr), ("y", t.uint), ("x", t.uint)], t.void);
    assert_eq!(
        single_error(classify_dev(&t, &f)),
        KernelError::CoordinateOrder {
            func: "k".into(),
            param: "x".into()
        }
    );
}

#[test]
fn duplicate_x_is_rejected() {
    let t = types();
    let f = func("k", &[("in", t.in_ptr), ("x", t.uint), ("x", t.uint)], t.void);
    assert_eq!(single_error(classify_dev(&t, &f)).code(), rsc_diagnostic::ErrorCode::E3007);
}

#[test]
fn coordinates_must_be_uint() {
    let t = types();
    let f = func("k", &[("in", t.in_ptr), ("x", t.int)], t.void);
    assert_eq!(
        single_error(classify_dev(&t, &f)),
        KernelError::CoordinateType {
            func: "k".into(),
            param: "x".into()
        }
    );
}

#[test]
fn pointer_after_coordinate_is_rejected() {
    let t = types();
    let f = func("k", &[("in", t.in_ptr), ("x", t.uint), ("out", t.out_ptr)], t.void);
    assert!(matches!(
        single_error(classify_dev(&t, &f)),
        KernelError::PointerAfterCoordinate { .. }
    ));
}

#[test]
fn output_after_user_data_is_rejected() {
    let t = types();
    let f = func(
        "k",
        &[("in", t.in_ptr), ("data", t.const_void_ptr), ("out", t.out_ptr)],
        t.void,
    );
    assert!(matches!(
        single_error(classify_dev(&t, &f)),
        KernelError::UnexpectedPointer { .. }
    ));
}

#[test]
fn foreach_must_return_void() {
    let t = types();
    let f = func("k", &[("in", t.in_ptr)], t.int).with_kernel(KernelAttr::ForEach);
    assert_eq!(
        single_error(classify_dev(&t, &f)),
        KernelError::ReturnNotVoid { func: "k".into() }
    );
}

#[test]
fn more_than_five_parameters_is_rejected() {
    let t = types();
    let f = func(
        "root",
        &[
            ("in", t.in_ptr),
            ("out", t.out_ptr),
            ("d", t.const_void_ptr),
            ("x", t.uint),
            ("y", t.uint),
            ("z", t.uint),
        ],
        t.void,
    );
    assert_eq!(
        single_error(classify_dev(&t, &f)),
        KernelError::TooManyParams {
            func: "root".into(),
            count: 6
        }
    );
}

#[test]
fn coordinates_only_has_no_in_or_out() {
    let t = types();
    let f = func("k", &[("x", t.uint)], t.void).with_kernel(KernelAttr::ForEach);
    assert_eq!(
        single_error(classify_dev(&t, &f)),
        KernelError::NoInOut { func: "k".into() }
    );
}

// ── Target API ─────────────────────────────────────────────────

#[test]
fn legacy_api_rejects_gapped_signatures() {
    let t = types();
    let f = func("root", &[("out", t.out_ptr), ("x", t.uint)], t.void);
    assert_eq!(
        single_error(classify(&f, &t.src, TargetApi::Level(14))),
        KernelError::LegacySignature {
            func: "root".into(),
            bits: 0b01010,
            api: TargetApi::Level(14),
        }
    );
    assert!(classify(&f, &t.src, TargetApi::Level(16)).is_ok());
}

#[test]
fn void_pointer_first_functions_are_kernels_from_jb() {
    let t = types();
    let f = func("blur", &[("in", t.in_ptr), ("out", t.out_ptr)], t.void);
    assert!(matches!(
        classify(&f, &t.src, TargetApi::Level(16)).unwrap(),
        KernelClass::ForEach(_)
    ));
    assert_eq!(
        classify(&f, &t.src, TargetApi::Level(14)).unwrap(),
        KernelClass::Invokable
    );
}

#[test]
fn plain_functions_are_invokable() {
    let t = types();
    let f = func("setup", &[("scale", t.float)], t.void);
    assert_eq!(classify_dev(&t, &f).unwrap(), KernelClass::Invokable);
}

// ── Reduce ─────────────────────────────────────────────────────

#[test]
fn reduce_kernel_accepted_in_development() {
    let t = types();
    let f = func("sum", &[("a", t.int), ("b", t.int)], t.int).with_kernel(KernelAttr::Reduce);
    assert_eq!(
        classify_dev(&t, &f).unwrap(),
        KernelClass::Reduce(ReduceShape { ty: t.int })
    );
}

#[test]
fn reduce_rejected_by_api_before_type_checks() {
    let t = types();
    let f = func("sum", &[("a", t.int), ("b", t.int)], t.int).with_kernel(KernelAttr::Reduce);
    assert_eq!(
        single_error(classify(&f, &t.src, TargetApi::Level(23))),
        KernelError::ReduceApi {
            func: "sum".into(),
            api: TargetApi::Level(23),
        }
    );
}

#[test]
fn reduce_reports_every_mismatch() {
    let t = types();
    let f = func("mix", &[("a", t.int), ("b", t.float)], t.int).with_kernel(KernelAttr::Reduce);
    let errors = classify_dev(&t, &f).unwrap_err();
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "Reduce-style kernel mix() return type 'int' is not the same type as parameter 'b' (type 'float')".to_string(),
            "In reduce-style kernel mix(): parameter 'a' (type 'int') does not have the same type as parameter 'b' (type 'float')".to_string(),
        ]
    );
}

#[test]
fn reduce_shape_errors() {
    let t = types();
    let void_ret = func("r", &[("a", t.int), ("b", t.int)], t.void).with_kernel(KernelAttr::Reduce);
    let errors = classify_dev(&t, &void_ret).unwrap_err();
    assert_eq!(errors[0], KernelError::ReduceVoidReturn { func: "r".into() });

    let one = func("r", &[("a", t.int)], t.int).with_kernel(KernelAttr::Reduce);
    assert_eq!(
        single_error(classify_dev(&t, &one)),
        KernelError::ReduceArity {
            func: "r".into(),
            count: 1
        }
    );

    let ptr = func("r", &[("a", t.out_ptr), ("b", t.out_ptr)], t.out_ptr)
        .with_kernel(KernelAttr::Reduce);
    let codes: Vec<_> = classify_dev(&t, &ptr)
        .unwrap_err()
        .iter()
        .map(KernelError::code)
        .collect();
    assert_eq!(
        codes,
        vec![
            rsc_diagnostic::ErrorCode::E3016,
            rsc_diagnostic::ErrorCode::E3017,
            rsc_diagnostic::ErrorCode::E3017,
        ]
    );
}
