//! Integration test: reference ordering end-to-end via Analyzer.
//!
//! Programs are assembled with `ProgramBuilder` at the exact positions a Go
//! front-end would report for the sources quoted above each test.

use refdir_core::program::{DeclId, Declaration, Node, ProgramBuilder, TypeExpr};
use refdir_core::{Analyzer, Direction, Finding, LintResult, Location, RefKind, Verdict};
use std::path::PathBuf;

const FILE: &str = "main.go";

fn at(line: usize, column: usize) -> Location {
    Location::new(FILE, line, column)
}

fn local_var(b: &mut ProgramBuilder, name: &str, line: usize, column: usize) -> DeclId {
    b.declare(Declaration::var(name, at(line, column)).local(at(line, 1)))
}

fn errors(result: &LintResult) -> Vec<&Finding> {
    result.by_verdict(Verdict::Error)
}

fn findings_on_line(result: &LintResult, line: usize) -> Vec<&Finding> {
    result
        .findings
        .iter()
        .filter(|f| f.location.line == line)
        .collect()
}

fn pointer_to(decl: DeclId) -> Option<TypeExpr> {
    Some(TypeExpr::Named { decl }.pointer())
}

// ── Recursion ──

// 4  func RecursiveFunctionSafe(n int) int {
// 5      if n <= 0 {
// 8      return 1 + RecursiveFunctionSafe(n-1)
// 12 func RecursiveGenericSafe[T any](n int, x T) int {
// 16     return 1 + RecursiveGenericSafe[T](n-1, x)
// 20 func MutualA(n int) int {
// 24     return MutualB(n - 1)
// 27 func MutualB(n int) int {
// 31     return MutualA(n - 1)
fn func_recursive() -> refdir_core::Program {
    let mut b = ProgramBuilder::new();
    let int = b.declare(Declaration::predeclared_type("int"));

    let safe = b.declare(Declaration::func("RecursiveFunctionSafe", at(4, 6)));
    let n1 = local_var(&mut b, "n", 4, 28);
    let sig1 = vec![b.def("n", 4, 28), b.use_of(int, 4, 30), b.use_of(int, 4, 35)];
    let body1 = vec![
        b.use_of(n1, 5, 5),
        Node::group(vec![b.use_of(safe, 8, 13), b.use_of(n1, 8, 35)]),
    ];
    let safe_fn = b.func(safe, vec![], sig1, body1);

    let generic = b.declare(Declaration::func("RecursiveGenericSafe", at(12, 6)));
    let instance =
        b.declare(Declaration::func("RecursiveGenericSafe", at(12, 6)).instance_of(generic));
    let sig2 = vec![b.def("T", 12, 27), b.def("n", 12, 34)];
    let body2 = vec![b.use_of(instance, 16, 13)];
    let generic_fn = b.func(generic, vec![], sig2, body2);

    let mutual_a = b.declare(Declaration::func("MutualA", at(20, 6)));
    let mutual_b = b.declare(Declaration::func("MutualB", at(27, 6)));
    let call_b = b.use_of(mutual_b, 24, 9);
    let a_fn = b.func(mutual_a, vec![], vec![], vec![call_b]);
    let call_a = b.use_of(mutual_a, 31, 9);
    let b_fn = b.func(mutual_b, vec![], vec![], vec![call_a]);

    b.file(FILE, vec![safe_fn, generic_fn, a_fn, b_fn]);
    b.build()
}

#[test]
fn direct_recursion_is_fully_suppressed() {
    let result = Analyzer::default().analyze(&func_recursive());

    let on_line_8: Vec<_> = findings_on_line(&result, 8)
        .into_iter()
        .filter(|f| f.location.column == 13)
        .collect();
    assert!(on_line_8.is_empty(), "unexpected: {on_line_8:#?}");
    assert!(findings_on_line(&result, 16).is_empty());
}

#[test]
fn mutual_recursion_reports_one_error() {
    let result = Analyzer::default().analyze(&func_recursive());

    let errors = errors(&result);
    assert_eq!(errors.len(), 1, "got: {errors:#?}");
    assert_eq!(errors[0].message, "func reference MutualA is after definition");
    assert_eq!(errors[0].location, at(31, 9).with_length(7));
    assert_eq!(errors[0].kind, Some(RefKind::Func));

    let call_b = findings_on_line(&result, 24);
    assert_eq!(call_b.len(), 1);
    assert_eq!(call_b[0].verdict, Verdict::Ok);
}

#[test]
fn parameters_are_local_info() {
    let result = Analyzer::default().analyze(&func_recursive());

    let n_use = findings_on_line(&result, 5);
    assert_eq!(n_use.len(), 1);
    assert_eq!(n_use[0].verdict, Verdict::Info);
    assert_eq!(
        n_use[0].message,
        "skipping var ident n with inner parent scope main.go:4:1"
    );
    assert!(findings_on_line(&result, 4)
        .iter()
        .all(|f| f.message == "skipping predeclared type int"));
}

// 4  type FooValue struct{}
// 6  func (f FooValue) Bar(n int) int {
// 10     return 1 + f.Bar(n-1)
// 14 type FooPtr struct{}
// 16 func (f *FooPtr) Bar(n int) int {
// 20     return 1 + f.Bar(n-1)
// 24 type Box[T any] struct{}
// 26 func (b Box[T]) Beat(n int) int {
// 30     return 1 + b.Beat(n-1)
#[test]
fn method_recursion_is_suppressed() {
    let mut b = ProgramBuilder::new();

    let foo_value = b.declare(Declaration::type_name("FooValue", at(4, 6)));
    let bar_value = b.declare(Declaration::method("Bar", at(6, 19)));
    let f1 = local_var(&mut b, "f", 6, 7);
    let recv1 = vec![b.def("f", 6, 7), b.use_of(foo_value, 6, 9)];
    let operand = b.use_of(f1, 10, 13);
    let body1 = vec![b.member(
        operand,
        bar_value,
        10,
        15,
        Some(TypeExpr::Named { decl: foo_value }),
    )];
    let value_fn = b.func(bar_value, recv1, vec![], body1);

    let foo_ptr = b.declare(Declaration::type_name("FooPtr", at(14, 6)));
    let bar_ptr = b.declare(Declaration::method("Bar", at(16, 18)));
    let f2 = local_var(&mut b, "f", 16, 7);
    let recv2 = vec![b.def("f", 16, 7), b.use_of(foo_ptr, 16, 10)];
    let operand = b.use_of(f2, 20, 13);
    let body2 = vec![b.member(operand, bar_ptr, 20, 15, pointer_to(foo_ptr))];
    let ptr_fn = b.func(bar_ptr, recv2, vec![], body2);

    let boxed = b.declare(Declaration::type_name("Box", at(24, 6)));
    let beat = b.declare(Declaration::method("Beat", at(26, 17)));
    let beat_instance = b.declare(Declaration::method("Beat", at(26, 17)).instance_of(beat));
    let b_var = local_var(&mut b, "b", 26, 7);
    let recv3 = vec![b.def("b", 26, 7), b.use_of(boxed, 26, 9), b.def("T", 26, 13)];
    let operand = b.use_of(b_var, 30, 13);
    let body3 = vec![b.member(
        operand,
        beat_instance,
        30,
        15,
        Some(TypeExpr::Named { decl: boxed }),
    )];
    let box_fn = b.func(beat, recv3, vec![], body3);

    b.file(FILE, vec![value_fn, ptr_fn, box_fn]);
    let result = Analyzer::default().analyze(&b.build());

    assert!(!result.has_errors(), "{:#?}", errors(&result));
    for line in [10, 20, 30] {
        let findings = findings_on_line(&result, line);
        assert_eq!(findings.len(), 1, "line {line}: {findings:#?}");
        assert!(findings[0].message.starts_with("skipping var ident"));
    }
    for line in [6, 16, 26] {
        let recv = findings_on_line(&result, line);
        assert_eq!(recv.len(), 1, "line {line}: {recv:#?}");
        assert_eq!(recv[0].kind, Some(RefKind::RecvType));
        assert_eq!(recv[0].verdict, Verdict::Ok);
    }
}

#[test]
fn transitive_recursion_is_reported_under_either_direction() {
    for direction in [Direction::Down, Direction::Up] {
        let analyzer = Analyzer::builder().direction(RefKind::Func, direction).build();
        let result = analyzer.analyze(&func_recursive());
        assert_eq!(errors(&result).len(), 1, "direction {direction}");
    }
}

// ── Interfaces and receiver types ──

// 3  func Greet(s Speaker) { s.Speak() }
// 5  type Speaker interface {
// 6      Speak()
// 9  type Dog struct{}
// 11 func (d Dog) Speak() {}
#[test]
fn named_interface_dispatch_checks_the_interface() {
    let mut b = ProgramBuilder::new();
    let greet = b.declare(Declaration::func("Greet", at(3, 6)));
    let speaker = b.declare(Declaration::interface("Speaker", at(5, 6)));
    let speak = b.declare(Declaration::method("Speak", at(6, 2)));
    let dog = b.declare(Declaration::type_name("Dog", at(9, 6)));
    let dog_speak = b.declare(Declaration::method("Speak", at(11, 14)));
    let s = local_var(&mut b, "s", 3, 12);

    let sig = vec![b.def("s", 3, 12), b.use_of(speaker, 3, 14)];
    let operand = b.use_of(s, 3, 24);
    let call = b.member(operand, speak, 3, 26, Some(TypeExpr::Named { decl: speaker }));
    let greet_fn = b.func(greet, vec![], sig, vec![call]);
    let recv = vec![b.def("d", 11, 7), b.use_of(dog, 11, 9)];
    let dog_fn = b.func(dog_speak, recv, vec![], vec![]);
    b.file(FILE, vec![greet_fn, dog_fn]);
    let program = b.build();

    let result = Analyzer::builder().verbose(true).build().analyze(&program);
    let speak_ref = result
        .findings
        .iter()
        .find(|f| f.location.column == 26)
        .expect("Speak is reported");
    assert_eq!(speak_ref.kind, Some(RefKind::Type));
    assert_eq!(speak_ref.verdict, Verdict::Error);
    assert_eq!(
        speak_ref.message,
        "type reference Speak is before definition (main.go:5:6)"
    );

    let relaxed = Analyzer::builder()
        .direction(RefKind::Type, Direction::Down)
        .build()
        .analyze(&program);
    assert!(!relaxed.has_errors(), "{:#?}", errors(&relaxed));
}

// 2  type Oven struct{}
// 4  func (o *Oven) Clone(other Oven) *Oven {
// 5      var spare Oven
// 9  type Tray struct{}
#[test]
fn receiver_type_is_checked_once() {
    let mut b = ProgramBuilder::new();
    let oven = b.declare(Declaration::type_name("Oven", at(2, 6)));
    let clone = b.declare(Declaration::method("Clone", at(4, 16)));
    let tray = b.declare(Declaration::type_name("Tray", at(9, 6)));

    let recv = vec![b.def("o", 4, 7), Node::group(vec![b.use_of(oven, 4, 10)])];
    let sig = vec![
        b.def("other", 4, 22),
        b.use_of(oven, 4, 28),
        b.use_of(oven, 4, 35),
    ];
    let body = vec![
        b.def("spare", 5, 6),
        b.use_of(oven, 5, 12),
        b.use_of(tray, 6, 9),
    ];
    let clone_fn = b.func(clone, recv, sig, body);
    b.file(FILE, vec![clone_fn]);

    let result = Analyzer::default().analyze(&b.build());
    let oven_refs: Vec<_> = result
        .findings
        .iter()
        .filter(|f| f.message.contains("Oven"))
        .collect();
    assert_eq!(oven_refs.len(), 1, "{oven_refs:#?}");
    assert_eq!(oven_refs[0].kind, Some(RefKind::RecvType));
    assert_eq!(oven_refs[0].message, "recvtype reference Oven is after definition");

    let tray_ref = findings_on_line(&result, 6);
    assert_eq!(tray_ref.len(), 1);
    assert_eq!(tray_ref[0].kind, Some(RefKind::Type));
    assert_eq!(tray_ref[0].verdict, Verdict::Error);
}

// ── Policy ──

#[test]
fn ignored_kind_never_errors() {
    let analyzer = Analyzer::builder()
        .direction(RefKind::Func, Direction::Ignore)
        .build();
    let result = analyzer.analyze(&func_recursive());

    assert!(!result.has_errors());
    let ignored = findings_on_line(&result, 31);
    assert_eq!(ignored[0].verdict, Verdict::Info);
    assert_eq!(ignored[0].message, "func reference MutualA ignored by options");
    assert!(result
        .findings
        .iter()
        .filter(|f| f.kind == Some(RefKind::Func))
        .all(|f| f.verdict == Verdict::Info));
}

// 3  func outer() {
// 4      total := 0
// 5      step := func() { total++ }
// 6      step()
// 7      _ = total
#[test]
fn locals_are_info_under_every_direction() {
    for direction in Direction::ALL {
        let mut b = ProgramBuilder::new();
        let outer = b.declare(Declaration::func("outer", at(3, 6)));
        let total = local_var(&mut b, "total", 4, 2);
        let step = b.declare(Declaration::func("step", at(5, 2)).local(at(3, 14)));
        let body = vec![
            b.def("total", 4, 2),
            b.def("step", 5, 2),
            b.use_of(total, 5, 19),
            b.use_of(step, 6, 2),
            b.use_of(total, 7, 6),
        ];
        let outer_fn = b.func(outer, vec![], vec![], body);
        b.file(FILE, vec![outer_fn]);

        let analyzer = Analyzer::builder()
            .direction(RefKind::Var, direction)
            .direction(RefKind::Func, direction)
            .build();
        let result = analyzer.analyze(&b.build());

        assert_eq!(result.findings.len(), 3, "{direction}");
        assert!(
            result.findings.iter().all(|f| f.verdict == Verdict::Info),
            "{direction}"
        );
        assert_eq!(
            findings_on_line(&result, 6)[0].message,
            "skipping func ident step with inner parent scope main.go:3:14"
        );
    }
}

#[test]
fn package_constants_and_vars_read_upward() {
    // 2  const MaxRetries = 3
    // 4  func run() { for i := 0; i < MaxRetries; i++ { attempts++ } }
    // 20 var attempts int
    let mut b = ProgramBuilder::new();
    let max = b.declare(Declaration::constant("MaxRetries", at(2, 7)));
    let run = b.declare(Declaration::func("run", at(4, 6)));
    let attempts = b.declare(Declaration::var("attempts", at(20, 5)));
    let body = vec![b.use_of(max, 4, 31), b.use_of(attempts, 4, 49)];
    let run_fn = b.func(run, vec![], vec![], body);
    let max_def = b.def("MaxRetries", 2, 7);
    b.file(FILE, vec![max_def, run_fn]);
    let result = Analyzer::default().analyze(&b.build());

    let errors = errors(&result);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, Some(RefKind::Var));
    assert_eq!(errors[0].message, "var reference attempts is before definition");
    assert_eq!(result.by_verdict(Verdict::Ok)[0].kind, Some(RefKind::Const));
}

#[test]
fn constant_declared_below_its_use_errors() {
    // 2  func retry() { for i := 0; i < MaxRetries; i++ {} }
    // 20 const MaxRetries = 3
    let mut b = ProgramBuilder::new();
    let retry = b.declare(Declaration::func("retry", at(2, 6)));
    let max = b.declare(Declaration::constant("MaxRetries", at(20, 7)));
    let body = vec![b.use_of(max, 2, 33)];
    let retry_fn = b.func(retry, vec![], vec![], body);
    let max_def = b.def("MaxRetries", 20, 7);
    b.file(FILE, vec![retry_fn, max_def]);
    let result = Analyzer::default().analyze(&b.build());

    let errors = errors(&result);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, Some(RefKind::Const));
    assert_eq!(errors[0].location, at(2, 33).with_length(10));
    assert_eq!(
        errors[0].message,
        "const reference MaxRetries is before definition"
    );
}

// ── Files ──

#[test]
fn generated_files_are_skipped() {
    let mut b = ProgramBuilder::new();
    let late = b.declare(Declaration::func("late", at(1, 6)));
    let call = b.use_of(late, 3, 2);
    b.generated_file("zz_generated.go", vec![call]).package_at(4, 1);
    let result = Analyzer::default().analyze(&b.build());

    assert_eq!(result.files_skipped, 1);
    assert_eq!(result.files_checked, 0);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].message, "skipping generated file");
    assert_eq!(
        result.findings[0].location,
        Location::new("zz_generated.go", 4, 1)
    );
}

#[test]
fn cross_file_references_are_info() {
    let mut b = ProgramBuilder::new();
    let helper = b.declare(Declaration::func("helper", Location::new("util.go", 3, 6)));
    let main = b.declare(Declaration::func("main", at(9, 6)));
    let call = b.use_of(helper, 10, 2);
    let main_fn = b.func(main, vec![], vec![], vec![call]);
    b.file(FILE, vec![main_fn]);
    let result = Analyzer::default().analyze(&b.build());

    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].verdict, Verdict::Info);
    assert_eq!(
        result.findings[0].message,
        "func reference helper is to definition in separate file (util.go:3:6)"
    );
}

#[test]
fn unresolved_and_positionless_uses_are_info() {
    let mut b = ProgramBuilder::new();
    let ghost = b.declare(Declaration::func("ghost", at(1, 6)).without_position());
    let nodes = vec![b.unresolved("missing", 3, 2), b.use_of(ghost, 4, 2)];
    b.file(FILE, nodes);
    let result = Analyzer::default().analyze(&b.build());

    let messages: Vec<_> = result.findings.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "got invalid definition position for \"missing\"",
            "got invalid definition position for \"ghost\"",
        ]
    );
}

#[test]
fn analyzes_program_document() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mutual.json");
    let result = Analyzer::default()
        .analyze_path(&path)
        .expect("fixture should load");

    assert_eq!(result.files_checked, 1);
    let errors = errors(&result);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "func reference MutualA is after definition");
}

// ── Pancake ──

//  5 func MakePancake() {
//  6     readRecipe()
//  8     visitStore()
// 10     mixFlour()
// 12     FindOven().
// 13         WarmUp().
// 14         WarmUp().
// 15         Bake()
// 17     Enjoy("pancake")
// 20 func visitStore() {
// 21     readRecipe()
// 22     buyFlour()
// 25 func mixFlour() {
// 26     log.Println("mixing flour~~")
// 29 func readRecipe() {
// 33 func buyFlour() {
// 37 type Oven struct {
// 38     temperature float32
// 41 func FindOven() *Oven { return &Oven{} }
// 43 func (s *Oven) WarmUp() *Oven {
// 44     s.temperature += 42
// 45     return s
// 48 func (s *Oven) Bake() {
// 52 func Enjoy(food string) {
// 53     log.Println(food + " is so good")
fn pancake() -> refdir_core::Program {
    let mut b = ProgramBuilder::new();
    let string = b.declare(Declaration::predeclared_type("string"));
    let float32 = b.declare(Declaration::predeclared_type("float32"));
    let log = b.declare(Declaration::package_name("log", at(3, 8)));
    let mut println = Declaration::func("Println", Location::new("log/log.go", 398, 6));
    println.package = Some("log".to_string());
    let println = b.declare(println);

    let make = b.declare(Declaration::func("MakePancake", at(5, 6)));
    let visit = b.declare(Declaration::func("visitStore", at(20, 6)));
    let mix = b.declare(Declaration::func("mixFlour", at(25, 6)));
    let read = b.declare(Declaration::func("readRecipe", at(29, 6)));
    let buy = b.declare(Declaration::func("buyFlour", at(33, 6)));
    let oven = b.declare(Declaration::type_name("Oven", at(37, 6)));
    let temperature = b.declare(Declaration::field("temperature", at(38, 2)));
    let find = b.declare(Declaration::func("FindOven", at(41, 6)));
    let warm = b.declare(Declaration::method("WarmUp", at(43, 16)));
    let bake = b.declare(Declaration::method("Bake", at(48, 16)));
    let enjoy = b.declare(Declaration::func("Enjoy", at(52, 6)));

    let log_call = |b: &mut ProgramBuilder, line: usize| {
        let pkg = b.use_of(log, line, 2);
        b.member(pkg, println, line, 6, None)
    };

    let find_call = b.use_of(find, 12, 2);
    let chain = b.member(find_call, warm, 13, 3, pointer_to(oven));
    let chain = b.member(chain, warm, 14, 3, pointer_to(oven));
    let chain = b.member(chain, bake, 15, 3, pointer_to(oven));
    let make_body = vec![
        b.use_of(read, 6, 2),
        b.use_of(visit, 8, 2),
        b.use_of(mix, 10, 2),
        chain,
        b.use_of(enjoy, 17, 2),
    ];
    let make_fn = b.func(make, vec![], vec![], make_body);

    let visit_body = vec![b.use_of(read, 21, 2), b.use_of(buy, 22, 2)];
    let visit_fn = b.func(visit, vec![], vec![], visit_body);
    let mix_body = vec![log_call(&mut b, 26)];
    let mix_fn = b.func(mix, vec![], vec![], mix_body);
    let read_body = vec![log_call(&mut b, 30)];
    let read_fn = b.func(read, vec![], vec![], read_body);
    let buy_body = vec![log_call(&mut b, 34)];
    let buy_fn = b.func(buy, vec![], vec![], buy_body);

    let oven_decl = Node::group(vec![
        b.def("Oven", 37, 6),
        b.def("temperature", 38, 2),
        b.use_of(float32, 38, 14),
    ]);

    let find_fn = {
        let sig = vec![b.use_of(oven, 41, 18)];
        let body = vec![b.use_of(oven, 41, 33)];
        b.func(find, vec![], sig, body)
    };

    let warm_fn = {
        let s = local_var(&mut b, "s", 43, 7);
        let recv = vec![b.def("s", 43, 7), b.use_of(oven, 43, 10)];
        let sig = vec![b.use_of(oven, 43, 26)];
        let operand = b.use_of(s, 44, 2);
        let body = vec![
            b.member(operand, temperature, 44, 4, pointer_to(oven)),
            b.use_of(s, 45, 9),
        ];
        b.func(warm, recv, sig, body)
    };

    let bake_fn = {
        let recv = vec![b.def("s", 48, 7), b.use_of(oven, 48, 10)];
        let body = vec![log_call(&mut b, 49)];
        b.func(bake, recv, vec![], body)
    };

    let enjoy_fn = {
        let food = local_var(&mut b, "food", 52, 12);
        let sig = vec![b.def("food", 52, 12), b.use_of(string, 52, 17)];
        let pkg = b.use_of(log, 53, 2);
        let println_call = b.member(pkg, println, 53, 6, None);
        let body = vec![println_call, b.use_of(food, 53, 14)];
        b.func(enjoy, vec![], sig, body)
    };

    let import = b.def("log", 3, 8);
    b.file(
        FILE,
        vec![
            import,
            make_fn,
            visit_fn,
            mix_fn,
            read_fn,
            buy_fn,
            oven_decl,
            find_fn,
            warm_fn,
            bake_fn,
            enjoy_fn,
        ],
    );
    b.build()
}

#[test]
fn pancake_example_reads_top_down() {
    let result = Analyzer::default().analyze(&pancake());

    assert!(!result.has_errors(), "{:#?}", errors(&result));
    let (_, infos, oks) = result.count_by_verdict();
    assert!(oks > 0);
    assert!(infos > 0);
}
