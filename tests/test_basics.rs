use undecorate::{demangle, ErrorKind};

fn expect(input: &str, reference: &str) {
    let demangled = demangle(input);
    if let Ok(demangled) = demangled {
        assert_eq!(demangled, reference);
    } else {
        panic!("{:?} != {:?}", demangled, Ok::<_, ()>(reference));
    }
}

fn expect_error(input: &str, kind: ErrorKind) {
    match demangle(input) {
        Ok(s) => panic!("expected {:?} for {:?}, got {:?}", kind, input, s),
        Err(err) => assert_eq!(err.kind(), Some(kind), "wrong error for {:?}", input),
    }
}

#[test]
fn variables() {
    expect("?x@@3HA", "int x");
    expect("?c@@3DA", "char c");
    expect("?sc@@3CA", "signed char sc");
    expect("?uc@@3EA", "unsigned char uc");
    expect("?s@@3FA", "short s");
    expect("?us@@3GA", "unsigned short us");
    expect("?ui@@3IA", "unsigned int ui");
    expect("?l@@3JA", "long l");
    expect("?ul@@3KA", "unsigned long ul");
    expect("?f@@3MA", "float f");
    expect("?d@@3NA", "double d");
    expect("?ld@@3OA", "long double ld");
    expect("?b@@3_NA", "bool b");
    expect("?ll@@3_JA", "long long ll");
    expect("?ull@@3_KA", "unsigned long long ull");
    expect("?w@@3_WA", "wchar_t w");
}

#[test]
fn scopes() {
    expect("?x@ns@@3HA", "int ns::x");
    expect("?x@a@b@c@@3HA", "int c::b::a::x");
}

#[test]
fn non_member_functions() {
    expect("?f@@YAXH@Z", "void f(int)");
    expect("?f@@YAXXZ", "void f(void)");
    expect("?add@@YAHHH@Z", "int add(int,int)");
    expect("?f@@YAMN@Z", "float f(double)");
    expect("?g@@YAPAHH@Z", "int * g(int)");
    expect("?f@@YA?BHH@Z", "int const f(int)");
}

#[test]
fn member_functions() {
    expect("?getx@Point@@QAEJXZ", "long Point::getx(void)");
    expect("?draw@Shape@@UAEXXZ", "void Shape::draw(void)");
    expect(
        "?create@Widget@@SAPAVWidget@@XZ",
        "class Widget * Widget::create(void)",
    );
}

#[test]
fn structors() {
    expect("??0A@@QAE@XZ", "A::A(void)");
    expect("??1A@@QAE@XZ", "A::~A(void)");
    expect("??0Point@@QAE@HH@Z", "Point::Point(int,int)");
    expect("??0B@A@@QAE@XZ", "A::B::B(void)");
    expect("??1B@A@@QAE@XZ", "A::B::~B(void)");
}

#[test]
fn pointers_and_references() {
    expect("?g@@YAXPAH@Z", "void g(int *)");
    expect("?g@@YAXPBH@Z", "void g(int const *)");
    expect("?g@@YAXQBH@Z", "void g(int const * const)");
    expect("?g@@YAXAAH@Z", "void g(int &)");
    expect("?g@@YAXAEAH@Z", "void g(int &)");
    expect("?p@@3PAPAHA", "int ** p");
}

#[test]
fn class_likes() {
    expect("?s@@3UFoo@@A", "struct Foo s");
    expect("?u@@3TBar@@A", "union Bar u");
    expect("?c@@3VBaz@@A", "class Baz c");
    expect("?e@@3W4Color@@A", "enum Color e");
    expect("?e@@3W4Color@paint@@A", "enum paint::Color e");
    expect("?o@@3VObj@gfx@scene@@A", "class scene::gfx::Obj o");
    expect("?f@@YAXUFoo@@@Z", "void f(struct Foo)");
}

#[test]
fn templates() {
    expect("?v@@3V?$vector@H@@A", "class vector<int> v");
    expect("?p@@3V?$pair@HN@@A", "class pair<int,double> p");
    expect("?z@@3V?$empty@@@A", "class empty z");
    expect(
        "?v@@3V?$vector@V?$vector@H@@@@A",
        "class vector<class vector<int>> v",
    );
}

#[test]
fn function_pointers() {
    expect("?cb@@3P6AXH@ZA", "void (* cb)(int)");
    expect("?f@@YAXP6AHH@Z@Z", "void f(int (*)(int))");
    // A function returning a pointer to an array needs its declarator
    // closed after the parameter list.
    expect("?x@@3P6AQAY01HH@ZA", "int (* const (* x)(int))[2]");
}

#[test]
fn arrays() {
    expect("?h@@YAHQAY01H@Z", "int h(int (* const)[2])");
    expect("?a@@3PAY09HA", "int (* a)[10]");
    expect("?a@@3PAY0BA@HA", "int (* a)[16]");
    expect("?m@@3PAY112HA", "int (* m)[2][3]");
    expect("?g@@YAHQAY0EA@$$CBH@Z", "int g(int const (* const)[64])");
}

#[test]
fn back_references() {
    expect("?f@@YAXUa@@U0@@Z", "void f(struct a,struct f)");
    expect("?f@@YAXUa@@U1@@Z", "void f(struct a,struct a)");
    // Only the first 10 identifiers are memorized; the rest still parse.
    expect(
        "?x@a@b@c@d@e@f@g@h@i@j@k@@3HA",
        "int k::j::i::h::g::f::e::d::c::b::a::x",
    );
    // Slot 9 is the last one filled; the citation resolves to a8.
    expect(
        "?f@@YAXUa0@@Ua1@@Ua2@@Ua3@@Ua4@@Ua5@@Ua6@@Ua7@@Ua8@@U9@@Z",
        "void f(struct a0,struct a1,struct a2,struct a3,struct a4,struct a5,struct a6,struct a7,struct a8,struct a8)",
    );
}

#[test]
fn non_mangled_pass_through() {
    expect("main", "main");
    expect("foo@bar", "foo@bar");
    expect("_Z3fooi", "_Z3fooi");
}

#[test]
fn errors() {
    expect_error("?foo", ErrorKind::UnterminatedString);
    expect_error("?", ErrorKind::UnterminatedString);
    expect_error("?f@@", ErrorKind::UnknownFuncClass);
    expect_error("?f@@GAEXXZ", ErrorKind::UnknownFuncClass);
    expect_error("?f@@YBXH@Z", ErrorKind::UnknownCallingConv);
    expect_error("?f@@Y", ErrorKind::UnknownCallingConv);
    expect_error("?x@@3LA", ErrorKind::UnknownPrimitive);
    expect_error("?x@@3_XA", ErrorKind::UnknownPrimitive);
    expect_error("?x@@3PAYZHA", ErrorKind::BadNumber);
    expect_error("?x@@3PAY?01HA", ErrorKind::InvalidArrayDimension);
    expect_error("?x@@3PAY?BA@1HA", ErrorKind::InvalidArrayDimension);
    expect_error("?a@@3PAY0?0HA", ErrorKind::InvalidArrayDimension);
    expect_error("?x@@3PAY01$$CEHA", ErrorKind::UnknownStorageClass);
    expect_error("?f@@YAXU5@@Z", ErrorKind::BadBackRef);
}

#[test]
fn error_reporting() {
    let err = demangle("?f@@YBXH@Z").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::UnknownCallingConv));
    assert_eq!(err.offset(), Some(6));
    assert_eq!(err.to_string(), "unknown calling convention (offset 6)");
}
