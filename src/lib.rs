//! undecorate is a crate that turns C++ symbol names mangled in the
//! Microsoft Visual C++ scheme ("decorated names") back into readable
//! declarations.  These names are emitted by the Microsoft C++ compiler for
//! Windows as well as some others.
//!
//! # Example
//!
//! ```
//! let result = undecorate::demangle("?f@@YAPAHH@Z").unwrap();
//! assert_eq!(result, "int * f(int)");
//! ```
//!
//! # Behavior
//!
//! The crate supports a pragmatic subset of the scheme: variables, free and
//! member functions, class-like and primitive types, pointers, references,
//! multi-dimensional arrays, templates, and name back-references.  Calling
//! conventions and member access classes are parsed and exposed on the AST
//! but do not appear in the rendered declaration; output follows one
//! canonical form rather than the whitespace conventions of any particular
//! `undname` version.
//!
//! Symbols that do not start with `?` are not mangled and come back
//! unchanged.
//!
//! # License
//!
//! This crate is dual licensed under the MIT and the University of Illinois
//! Open Source Licenses.

#![deny(missing_debug_implementations)]
#![deny(unsafe_code)]

#[macro_use]
extern crate bitflags;

use std::fmt;
use std::io;
use std::io::Write;
use std::result;
use std::string::FromUtf8Error;

/// What went wrong, in terms of the mangling grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// An embedded integer is neither a decimal digit nor a
    /// `@`-terminated run of hex digits.
    #[error("bad number")]
    BadNumber,
    /// An identifier ran to the end of the input without its `@`.
    #[error("unterminated string")]
    UnterminatedString,
    /// A digit cited a back-reference slot that has not been filled.
    #[error("name back-reference out of range")]
    BadBackRef,
    #[error("unknown function class")]
    UnknownFuncClass,
    #[error("unknown calling convention")]
    UnknownCallingConv,
    #[error("unknown primitive type")]
    UnknownPrimitive,
    #[error("invalid array dimension")]
    InvalidArrayDimension,
    #[error("unknown storage class")]
    UnknownStorageClass,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input violated the mangling grammar at `offset`.
    #[error("{kind} (offset {offset})")]
    Parse { kind: ErrorKind, offset: usize },
    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// The grammar-level error kind, if this is a parse error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match *self {
            Error::Parse { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Returns the offset in the input where the error happened.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Error::Parse { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

type Result<T> = result::Result<T, Error>;

bitflags! {
    /// Type qualifiers. Only `CONST` appears in rendered output.
    pub struct StorageClass: u32 {
        const CONST     = 0b00_0001;
        const VOLATILE  = 0b00_0010;
        const FAR       = 0b00_0100;
        const HUGE      = 0b00_1000;
        const UNALIGNED = 0b01_0000;
        const RESTRICT  = 0b10_0000;
    }
}

bitflags! {
    /// Access and lifetime attributes of a member function.
    pub struct FuncClass: u32 {
        const PUBLIC    = 0b000_0001;
        const PROTECTED = 0b000_0010;
        const PRIVATE   = 0b000_0100;
        const GLOBAL    = 0b000_1000;
        const STATIC    = 0b001_0000;
        const VIRTUAL   = 0b010_0000;
        const FAR       = 0b100_0000;
    }
}

// Calling conventions
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CallingConv {
    Cdecl,
    Pascal,
    Thiscall,
    Stdcall,
    Fastcall,
    _Regcall,
}

/// A qualified name as a sequence of raw identifier fragments, innermost
/// first: `A::B::f` is stored as `[f, B, A]`.  Structor fragments keep
/// their `?0`/`?1` prefix; the serializer expands them.
#[derive(Clone, PartialEq)]
pub struct NameSequence<'a> {
    pub names: Vec<&'a [u8]>,
}

impl<'a> fmt::Debug for NameSequence<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.names.iter().map(|n| String::from_utf8_lossy(n)))
            .finish()
    }
}

/// Function parameters or template arguments, in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct Params<'a> {
    pub types: Vec<Type<'a>>,
}

// The type class. Mangled symbols are first parsed and converted to
// this type and then converted to string.
#[derive(Clone, Debug, PartialEq)]
pub enum Type<'a> {
    /// A symbol that was not mangled at all; the name carries everything.
    Unknown,
    /// The suppressed return type of a constructor or destructor.
    None,
    MemberFunction(FuncClass, CallingConv, Params<'a>, Box<Type<'a>>),
    NonMemberFunction(CallingConv, Params<'a>, Box<Type<'a>>),
    Ptr(Box<Type<'a>>, StorageClass),
    Ref(Box<Type<'a>>, StorageClass),
    Array(i32, Box<Type<'a>>, StorageClass),

    Struct(NameSequence<'a>, Params<'a>, StorageClass),
    Union(NameSequence<'a>, Params<'a>, StorageClass),
    Class(NameSequence<'a>, Params<'a>, StorageClass),
    Enum(NameSequence<'a>, StorageClass),

    Void(StorageClass),
    Bool(StorageClass),
    Char(StorageClass),
    Schar(StorageClass),
    Uchar(StorageClass),
    Short(StorageClass),
    Ushort(StorageClass),
    Int(StorageClass),
    Uint(StorageClass),
    Long(StorageClass),
    Ulong(StorageClass),
    Llong(StorageClass),
    Ullong(StorageClass),
    Wchar(StorageClass),
    Float(StorageClass),
    Double(StorageClass),
    Ldouble(StorageClass),
}

/// The two halves of a parsed symbol: its qualified name and the type of
/// the entity the name refers to.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult<'a> {
    pub symbol: NameSequence<'a>,
    pub symbol_type: Type<'a>,
}

// The parser state. read_* functions shorten `remaining` as they go;
// `offset` tracks how far we got for error reporting.
struct ParserState<'a> {
    remaining: &'a [u8],
    offset: usize,

    // The first 10 identifiers in a mangled name can be back-referenced by
    // a single digit 0-9. This is the storage for those identifiers.
    memorized_names: Vec<&'a [u8]>,
}

impl<'a> ParserState<'a> {
    fn fail(&self, kind: ErrorKind) -> Error {
        Error::Parse {
            kind,
            offset: self.offset,
        }
    }

    fn parse(&mut self) -> Result<ParseResult<'a>> {
        // MSVC-style mangled symbols must start with b'?'. Anything else
        // passes through as a plain identifier.
        if !self.consume(b"?") {
            return Ok(ParseResult {
                symbol: NameSequence {
                    names: vec![self.remaining],
                },
                symbol_type: Type::Unknown,
            });
        }

        // What follows is the main symbol name. This may include
        // namespaces or class names.
        let symbol = self.read_name()?;

        // Read a variable.
        if self.consume(b"3") {
            let symbol_type = self.read_var_type(StorageClass::empty())?;
            return Ok(ParseResult {
                symbol,
                symbol_type,
            });
        }

        // Read a non-member function.
        if self.consume(b"Y") {
            let calling_conv = self.read_calling_conv()?;
            let sc = self.read_storage_class_for_return();
            let return_type = self.read_var_type(sc)?;
            let params = self.read_params()?;
            return Ok(ParseResult {
                symbol,
                symbol_type: Type::NonMemberFunction(calling_conv, params, Box::new(return_type)),
            });
        }

        // Read a member function.
        let func_class = self.read_func_class()?;
        self.consume(b"E"); // 64-bit 'this' pointer
        let calling_conv = self.read_calling_conv()?;
        let sc = self.read_storage_class();
        let return_type = self.read_func_return_type(sc)?;
        let params = self.read_params()?;
        Ok(ParseResult {
            symbol,
            symbol_type: Type::MemberFunction(
                func_class,
                calling_conv,
                params,
                Box::new(return_type),
            ),
        })
    }

    fn peek(&self) -> Option<u8> {
        self.remaining.first().cloned()
    }

    fn get(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.advance(1);
        Some(c)
    }

    fn consume(&mut self, s: &[u8]) -> bool {
        if self.remaining.starts_with(s) {
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    fn advance(&mut self, len: usize) {
        let new_remaining = self.remaining.get(len..).unwrap_or(&[]);
        self.offset += self.remaining.len() - new_remaining.len();
        self.remaining = new_remaining;
    }

    fn read_digit(&mut self) -> Option<u8> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                self.advance(1);
                Some(c - b'0')
            }
            _ => None,
        }
    }

    // Sometimes numbers are embedded in mangled symbols. For example,
    // "int (*x)[20]" is a valid C type (x is a pointer to an array of
    // length 20), so we need some way to encode numbers as part of symbols.
    //
    // <number>               ::= [?] <non-negative integer>
    //
    // <non-negative integer> ::= <decimal digit> # when 1 <= Number <= 10
    //                        ::= <hex digit>+ @  # when Number == 0 or >= 11
    //
    // <hex-digit>            ::= [A-P]           # A = 0, B = 1, ...
    fn read_number(&mut self) -> Result<i32> {
        let neg = self.consume(b"?");

        if let Some(digit) = self.read_digit() {
            let ret = i32::from(digit) + 1;
            return Ok(if neg { -ret } else { ret });
        }

        let mut i = 0;
        let mut ret: i32 = 0;
        for &c in self.remaining {
            match c {
                b'@' => {
                    self.advance(i + 1);
                    return Ok(if neg { ret.wrapping_neg() } else { ret });
                }
                b'A'..=b'P' => {
                    ret = ret.wrapping_shl(4).wrapping_add(i32::from(c - b'A'));
                    i += 1;
                }
                _ => break,
            }
        }
        Err(self.fail(ErrorKind::BadNumber))
    }

    // Read an identifier, up to and including the next b'@'.
    fn read_string(&mut self) -> Result<&'a [u8]> {
        if let Some(pos) = self.remaining.iter().position(|&x| x == b'@') {
            let ret = &self.remaining[0..pos];
            self.advance(pos + 1);
            Ok(ret)
        } else {
            Err(self.fail(ErrorKind::UnterminatedString))
        }
    }

    fn memorize_name(&mut self, n: &'a [u8]) {
        if self.memorized_names.len() < 10 {
            self.memorized_names.push(n);
        }
    }

    // Parses a name in the form of A@B@C@@ which represents C::B::A.
    fn read_name(&mut self) -> Result<NameSequence<'a>> {
        let mut names = Vec::new();
        while !self.consume(b"@") {
            if let Some(i) = self.read_digit() {
                let i = i as usize;
                if i >= self.memorized_names.len() {
                    return Err(self.fail(ErrorKind::BadBackRef));
                }
                names.push(self.memorized_names[i]);
                continue;
            }

            let name = self.read_string()?;
            self.memorize_name(name);
            names.push(name);
        }
        Ok(NameSequence { names })
    }

    fn read_func_class(&mut self) -> Result<FuncClass> {
        Ok(match self.get() {
            Some(b'A') => FuncClass::PRIVATE,
            Some(b'B') => FuncClass::PRIVATE | FuncClass::FAR,
            Some(b'C') => FuncClass::PRIVATE | FuncClass::STATIC,
            Some(b'D') => FuncClass::PRIVATE | FuncClass::STATIC,
            Some(b'E') => FuncClass::PRIVATE | FuncClass::VIRTUAL,
            Some(b'F') => FuncClass::PRIVATE | FuncClass::VIRTUAL,
            Some(b'I') => FuncClass::PROTECTED,
            Some(b'J') => FuncClass::PROTECTED | FuncClass::FAR,
            Some(b'K') => FuncClass::PROTECTED | FuncClass::STATIC,
            Some(b'L') => FuncClass::PROTECTED | FuncClass::STATIC | FuncClass::FAR,
            Some(b'M') => FuncClass::PROTECTED | FuncClass::VIRTUAL,
            Some(b'N') => FuncClass::PROTECTED | FuncClass::VIRTUAL | FuncClass::FAR,
            Some(b'Q') => FuncClass::PUBLIC,
            Some(b'R') => FuncClass::PUBLIC | FuncClass::FAR,
            Some(b'S') => FuncClass::PUBLIC | FuncClass::STATIC,
            Some(b'T') => FuncClass::PUBLIC | FuncClass::STATIC | FuncClass::FAR,
            Some(b'U') => FuncClass::PUBLIC | FuncClass::VIRTUAL,
            Some(b'V') => FuncClass::PUBLIC | FuncClass::VIRTUAL | FuncClass::FAR,
            Some(b'Y') => FuncClass::GLOBAL,
            Some(b'Z') => FuncClass::GLOBAL | FuncClass::FAR,
            _ => return Err(self.fail(ErrorKind::UnknownFuncClass)),
        })
    }

    fn read_calling_conv(&mut self) -> Result<CallingConv> {
        Ok(match self.get() {
            Some(b'A') => CallingConv::Cdecl,
            Some(b'C') => CallingConv::Pascal,
            Some(b'E') => CallingConv::Thiscall,
            Some(b'G') => CallingConv::Stdcall,
            Some(b'I') => CallingConv::Fastcall,
            _ => return Err(self.fail(ErrorKind::UnknownCallingConv)),
        })
    }

    fn read_storage_class(&mut self) -> StorageClass {
        let storage_class = match self.peek() {
            Some(b'A') => StorageClass::empty(),
            Some(b'B') => StorageClass::CONST,
            Some(b'C') => StorageClass::VOLATILE,
            Some(b'D') => StorageClass::CONST | StorageClass::VOLATILE,
            Some(b'E') => StorageClass::FAR,
            Some(b'F') => StorageClass::CONST | StorageClass::FAR,
            Some(b'G') => StorageClass::VOLATILE | StorageClass::FAR,
            Some(b'H') => StorageClass::CONST | StorageClass::VOLATILE | StorageClass::FAR,
            _ => return StorageClass::empty(),
        };
        self.advance(1);
        storage_class
    }

    fn read_storage_class_for_return(&mut self) -> StorageClass {
        if self.consume(b"?A") {
            StorageClass::empty()
        } else if self.consume(b"?B") {
            StorageClass::CONST
        } else if self.consume(b"?C") {
            StorageClass::VOLATILE
        } else if self.consume(b"?D") {
            StorageClass::CONST | StorageClass::VOLATILE
        } else {
            StorageClass::empty()
        }
    }

    // <return-type> ::= <type>
    //               ::= @ # structors (they have no declared return type)
    fn read_func_return_type(&mut self, sc: StorageClass) -> Result<Type<'a>> {
        if self.consume(b"@") {
            return Ok(Type::None);
        }
        let ty = self.read_var_type(sc)?;
        self.consume(b"@");
        Ok(ty)
    }

    // Reads a variable type.
    fn read_var_type(&mut self, sc: StorageClass) -> Result<Type<'a>> {
        if self.consume(b"W4") {
            return Ok(Type::Enum(self.read_name()?, sc));
        }

        if self.consume(b"P6A") {
            // Pointer to function. The b'A' is the cdecl calling convention;
            // other conventions are not part of the supported encoding.
            let return_type = self.read_var_type(StorageClass::empty())?;
            let mut types = Vec::new();
            while !self.consume(b"@Z") && !self.consume(b"Z") {
                types.push(self.read_var_type(StorageClass::empty())?);
            }
            let func = Type::NonMemberFunction(
                CallingConv::Cdecl,
                Params { types },
                Box::new(return_type),
            );
            return Ok(Type::Ptr(Box::new(func), sc));
        }

        if self.consume(b"Y") {
            return self.read_array(sc);
        }

        Ok(match self.get() {
            Some(b'T') => {
                let (name, params) = self.read_class()?;
                Type::Union(name, params, sc)
            }
            Some(b'U') => {
                let (name, params) = self.read_class()?;
                Type::Struct(name, params, sc)
            }
            Some(b'V') => {
                let (name, params) = self.read_class()?;
                Type::Class(name, params, sc)
            }
            Some(b'A') => Type::Ref(Box::new(self.read_pointee()?), sc),
            Some(b'P') => Type::Ptr(Box::new(self.read_pointee()?), sc),
            Some(b'Q') => Type::Ptr(Box::new(self.read_pointee()?), StorageClass::CONST),
            Some(b'X') => Type::Void(sc),
            Some(b'D') => Type::Char(sc),
            Some(b'C') => Type::Schar(sc),
            Some(b'E') => Type::Uchar(sc),
            Some(b'F') => Type::Short(sc),
            Some(b'G') => Type::Ushort(sc),
            Some(b'H') => Type::Int(sc),
            Some(b'I') => Type::Uint(sc),
            Some(b'J') => Type::Long(sc),
            Some(b'K') => Type::Ulong(sc),
            Some(b'M') => Type::Float(sc),
            Some(b'N') => Type::Double(sc),
            Some(b'O') => Type::Ldouble(sc),
            Some(b'_') => match self.get() {
                Some(b'N') => Type::Bool(sc),
                Some(b'J') => Type::Llong(sc),
                Some(b'K') => Type::Ullong(sc),
                Some(b'W') => Type::Wchar(sc),
                _ => return Err(self.fail(ErrorKind::UnknownPrimitive)),
            },
            _ => return Err(self.fail(ErrorKind::UnknownPrimitive)),
        })
    }

    fn read_pointee(&mut self) -> Result<Type<'a>> {
        self.consume(b"E"); // 64-bit pointer
        let sc = self.read_storage_class();
        self.read_var_type(sc)
    }

    // Reads the name of a struct/union/class, which is either a plain name
    // path or b"?$" followed by a template name and its argument types.
    // Template names do not enter the back-reference table.
    fn read_class(&mut self) -> Result<(NameSequence<'a>, Params<'a>)> {
        if self.consume(b"?$") {
            let name = self.read_string()?;
            let mut types = Vec::new();
            while !self.consume(b"@") {
                types.push(self.read_var_type(StorageClass::empty())?);
            }
            return Ok((NameSequence { names: vec![name] }, Params { types }));
        }
        Ok((self.read_name()?, Params { types: Vec::new() }))
    }

    fn read_array(&mut self, sc: StorageClass) -> Result<Type<'a>> {
        let dimension = self.read_number()?;
        if dimension <= 0 {
            return Err(self.fail(ErrorKind::InvalidArrayDimension));
        }

        let mut lens = Vec::new();
        for _ in 0..dimension {
            let len = self.read_number()?;
            if len <= 0 {
                return Err(self.fail(ErrorKind::InvalidArrayDimension));
            }
            lens.push(len);
        }

        // An optional b"$$C" block qualifies the element type; the bits
        // stick to the outermost dimension. Without it the outermost
        // dimension inherits the caller's storage class.
        let outer_sc = if self.consume(b"$$C") {
            if self.consume(b"B") {
                StorageClass::CONST
            } else if self.consume(b"C") || self.consume(b"D") {
                StorageClass::CONST | StorageClass::VOLATILE
            } else if self.consume(b"A") {
                StorageClass::empty()
            } else {
                return Err(self.fail(ErrorKind::UnknownStorageClass));
            }
        } else {
            sc
        };

        let mut ty = self.read_var_type(StorageClass::empty())?;
        for &len in lens.iter().skip(1).rev() {
            ty = Type::Array(len, Box::new(ty), StorageClass::empty());
        }
        Ok(Type::Array(lens[0], Box::new(ty), outer_sc))
    }

    // Reads function parameters. The list ends at the input's end or at a
    // terminator (b'@' for free functions, b'Z' for member functions),
    // which is left for the caller.
    fn read_params(&mut self) -> Result<Params<'a>> {
        let mut types = Vec::new();
        while !self.remaining.is_empty()
            && !self.remaining.starts_with(b"@")
            && !self.remaining.starts_with(b"Z")
        {
            types.push(self.read_var_type(StorageClass::empty())?);
        }
        Ok(Params { types })
    }
}

/// Demangles a decorated symbol into a C++ declaration.
pub fn demangle(input: &str) -> Result<String> {
    serialize(&parse(input)?)
}

/// Parses a decorated symbol into its name path and type tree.
pub fn parse(input: &str) -> Result<ParseResult> {
    let mut state = ParserState {
        remaining: input.as_bytes(),
        offset: 0,
        memorized_names: Vec::with_capacity(10),
    };
    state.parse()
}

/// Renders a parsed symbol as a C++ declaration.
pub fn serialize(input: &ParseResult) -> Result<String> {
    let mut s = Vec::new();
    {
        let mut serializer = Serializer { w: &mut s };
        serializer.serialize(input)?;
    }
    Ok(String::from_utf8(s)?)
}

// Converts an AST to a string.
//
// Converting an AST representing a C++ type to a string is tricky due
// to the bad grammar of the C++ declaration inherited from C. You have
// to construct a string from inside to outside. For example, if a type
// X is a pointer to a function returning int, the order you create a
// string becomes something like this:
//
//   (1) X is a pointer: *X
//   (2) (1) is a function returning int: int (*X)()
//
// So you cannot construct a result just by appending strings to a result.
//
// To deal with this, we split the function into two. write_pre() writes
// the "first half" of type declaration, and write_post() writes the
// "second half". For example, write_pre() writes a return type for a
// function and write_post() writes a parameter list.
struct Serializer<'a> {
    w: &'a mut Vec<u8>,
}

impl<'a> Serializer<'a> {
    fn serialize(&mut self, parse_result: &ParseResult) -> Result<()> {
        self.write_pre(&parse_result.symbol_type)?;
        self.write_name(&parse_result.symbol)?;
        self.write_post(&parse_result.symbol_type)?;
        Ok(())
    }

    // Write the "first half" of a given type.
    fn write_pre(&mut self, t: &Type) -> Result<()> {
        let storage_class = match *t {
            Type::Unknown | Type::None => return Ok(()),
            Type::MemberFunction(_, _, _, ref return_type)
            | Type::NonMemberFunction(_, _, ref return_type) => {
                self.write_pre(return_type)?;
                return Ok(());
            }
            Type::Ptr(ref inner, sc) | Type::Ref(ref inner, sc) => {
                self.write_pre(inner)?;

                // "[]" and "()" (for function parameters) take precedence
                // over "*", so "int *x(int)" means "x is a function
                // returning int *". We need parentheses to supersede the
                // default precedence (e.g. we want to emit something like
                // "int (*x)(int)").
                if let Type::MemberFunction(..) | Type::NonMemberFunction(..) | Type::Array(..) =
                    **inner
                {
                    self.write_space_ptr()?;
                    write!(self.w, "(")?;
                }

                self.write_space_ptr()?;
                match *t {
                    Type::Ptr(..) => write!(self.w, "*")?,
                    _ => write!(self.w, "&")?,
                }
                sc
            }
            Type::Array(_, ref inner, sc) => {
                self.write_pre(inner)?;
                sc
            }
            Type::Struct(ref name, ref params, sc) => {
                self.write_class(name, params, "struct")?;
                sc
            }
            Type::Union(ref name, ref params, sc) => {
                self.write_class(name, params, "union")?;
                sc
            }
            Type::Class(ref name, ref params, sc) => {
                self.write_class(name, params, "class")?;
                sc
            }
            Type::Enum(ref name, sc) => {
                write!(self.w, "enum ")?;
                self.write_name(name)?;
                sc
            }
            Type::Void(sc) => {
                write!(self.w, "void")?;
                sc
            }
            Type::Bool(sc) => {
                write!(self.w, "bool")?;
                sc
            }
            Type::Char(sc) => {
                write!(self.w, "char")?;
                sc
            }
            Type::Schar(sc) => {
                write!(self.w, "signed char")?;
                sc
            }
            Type::Uchar(sc) => {
                write!(self.w, "unsigned char")?;
                sc
            }
            Type::Short(sc) => {
                write!(self.w, "short")?;
                sc
            }
            Type::Ushort(sc) => {
                write!(self.w, "unsigned short")?;
                sc
            }
            Type::Int(sc) => {
                write!(self.w, "int")?;
                sc
            }
            Type::Uint(sc) => {
                write!(self.w, "unsigned int")?;
                sc
            }
            Type::Long(sc) => {
                write!(self.w, "long")?;
                sc
            }
            Type::Ulong(sc) => {
                write!(self.w, "unsigned long")?;
                sc
            }
            Type::Llong(sc) => {
                write!(self.w, "long long")?;
                sc
            }
            Type::Ullong(sc) => {
                write!(self.w, "unsigned long long")?;
                sc
            }
            Type::Wchar(sc) => {
                write!(self.w, "wchar_t")?;
                sc
            }
            Type::Float(sc) => {
                write!(self.w, "float")?;
                sc
            }
            Type::Double(sc) => {
                write!(self.w, "double")?;
                sc
            }
            Type::Ldouble(sc) => {
                write!(self.w, "long double")?;
                sc
            }
        };

        if storage_class.contains(StorageClass::CONST) {
            self.write_space()?;
            write!(self.w, "const")?;
        }

        Ok(())
    }

    // Write the "second half" of a given type.
    fn write_post(&mut self, t: &Type) -> Result<()> {
        match *t {
            Type::MemberFunction(_, _, ref params, ref return_type)
            | Type::NonMemberFunction(_, ref params, ref return_type) => {
                write!(self.w, "(")?;
                self.write_params(&params.types)?;
                write!(self.w, ")")?;
                self.write_post(return_type)?;
            }
            Type::Ptr(ref inner, _) | Type::Ref(ref inner, _) => {
                if let Type::MemberFunction(..) | Type::NonMemberFunction(..) | Type::Array(..) =
                    **inner
                {
                    write!(self.w, ")")?;
                }
                self.write_post(inner)?;
            }
            Type::Array(len, ref inner, _) => {
                write!(self.w, "[{}]", len)?;
                self.write_post(inner)?;
            }
            _ => {}
        }
        Ok(())
    }

    // Write a function or template parameter list.
    fn write_params(&mut self, types: &[Type]) -> Result<()> {
        for (idx, param) in types.iter().enumerate() {
            if idx > 0 {
                write!(self.w, ",")?;
            }
            self.write_pre(param)?;
            self.write_post(param)?;
        }
        Ok(())
    }

    fn write_class(&mut self, name: &NameSequence, params: &Params, s: &str) -> Result<()> {
        write!(self.w, "{} ", s)?;
        self.write_name(name)?;
        if !params.types.is_empty() {
            write!(self.w, "<")?;
            self.write_params(&params.types)?;
            write!(self.w, ">")?;
        }
        Ok(())
    }

    // Write a name read by read_name(): outermost fragment first, joined
    // with "::". ?0 and ?1 are special fragments for ctors and dtors.
    fn write_name(&mut self, names: &NameSequence) -> Result<()> {
        if names.names.is_empty() {
            return Ok(());
        }
        self.write_space()?;

        for name in names.names.iter().skip(1).rev() {
            self.w.write_all(name)?;
            write!(self.w, "::")?;
        }

        let innermost = names.names[0];
        if let Some(class) = innermost.strip_prefix(b"?0") {
            self.w.write_all(class)?;
            write!(self.w, "::")?;
            self.w.write_all(class)?;
        } else if let Some(class) = innermost.strip_prefix(b"?1") {
            self.w.write_all(class)?;
            write!(self.w, "::~")?;
            self.w.write_all(class)?;
        } else {
            self.w.write_all(innermost)?;
        }
        Ok(())
    }

    fn write_space(&mut self) -> Result<()> {
        if let Some(&c) = self.w.last() {
            if char::from(c).is_ascii_alphabetic()
                || c == b'*'
                || c == b'&'
                || c == b'>'
                || c == b')'
            {
                write!(self.w, " ")?;
            }
        }
        Ok(())
    }

    fn write_space_ptr(&mut self) -> Result<()> {
        if let Some(&c) = self.w.last() {
            if char::from(c).is_ascii_alphabetic() || c == b'>' || c == b')' {
                write!(self.w, " ")?;
            }
        }
        Ok(())
    }
}
