//! JVM field/method descriptors and generic signatures.
//!
//! Signatures are a superset of descriptors, so one parser handles both: `I`, `[Ljava/lang/String;`,
//! `Ljava/util/List<+Lnet/example/Packet;>;`, `TE;`.

use thiserror::Error;

use crate::PrimitiveType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("invalid descriptor `{0}`")]
    InvalidDescriptor(String),
    #[error("unexpected trailing input `{rest}` in `{input}`")]
    TrailingInput { input: String, rest: String },
}

pub type Result<T> = std::result::Result<T, DescriptorError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(PrimitiveType),
    /// Binary class name (dots, `$` for nested types) with the leaf's type arguments.
    Class {
        binary_name: String,
        args: Vec<TypeArgument>,
    },
    Array(Box<TypeSignature>),
    TypeVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    Any,
    Exact(TypeSignature),
    Extends(TypeSignature),
    Super(TypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub params: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
}

pub fn parse_type_signature(input: &str) -> Result<TypeSignature> {
    let (sig, rest) = parse_type(input, input)?;
    if !rest.is_empty() {
        return Err(trailing(input, rest));
    }
    Ok(sig)
}

/// Formal type parameters and `throws` clauses are accepted and dropped.
pub fn parse_method_signature(input: &str) -> Result<MethodSignature> {
    let mut rest = skip_formal_type_params(input, input)?
        .strip_prefix('(')
        .ok_or_else(|| invalid(input))?;

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(invalid(input));
        }
        let (param, after) = parse_type(rest, input)?;
        params.push(param);
        rest = after;
    }

    let (return_type, mut rest) = match rest.strip_prefix('V') {
        Some(after) => (None, after),
        None => {
            let (ty, after) = parse_type(rest, input)?;
            (Some(ty), after)
        }
    };

    while let Some(after) = rest.strip_prefix('^') {
        let (_, after) = parse_type(after, input)?;
        rest = after;
    }

    if !rest.is_empty() {
        return Err(trailing(input, rest));
    }
    Ok(MethodSignature {
        params,
        return_type,
    })
}

// `<T:Ljava/lang/Number;U::Ljava/lang/Runnable;>`; an empty class bound shows up as `::`.
fn skip_formal_type_params<'a>(input: &'a str, whole: &str) -> Result<&'a str> {
    let Some(mut rest) = input.strip_prefix('<') else {
        return Ok(input);
    };
    loop {
        if let Some(after) = rest.strip_prefix('>') {
            return Ok(after);
        }
        let colon = rest.find(':').ok_or_else(|| invalid(whole))?;
        if colon == 0 {
            return Err(invalid(whole));
        }
        rest = &rest[colon..];
        while let Some(after) = rest.strip_prefix(':') {
            rest = after;
            if !rest.starts_with(':') {
                let (_, after) = parse_type(rest, whole)?;
                rest = after;
            }
        }
    }
}

fn parse_type<'a>(input: &'a str, whole: &str) -> Result<(TypeSignature, &'a str)> {
    let Some(first) = input.chars().next() else {
        return Err(invalid(whole));
    };
    let rest = &input[first.len_utf8()..];
    if let Some(prim) = PrimitiveType::from_descriptor(first) {
        return Ok((TypeSignature::Base(prim), rest));
    }
    match first {
        '[' => {
            let (component, rest) = parse_type(rest, whole)?;
            Ok((TypeSignature::Array(Box::new(component)), rest))
        }
        'T' => {
            let end = rest.find(';').ok_or_else(|| invalid(whole))?;
            if end == 0 {
                return Err(invalid(whole));
            }
            Ok((
                TypeSignature::TypeVariable(rest[..end].to_owned()),
                &rest[end + 1..],
            ))
        }
        'L' => parse_class(rest, whole),
        _ => Err(invalid(whole)),
    }
}

// `rest` starts right after the leading `L`.
fn parse_class<'a>(mut rest: &'a str, whole: &str) -> Result<(TypeSignature, &'a str)> {
    let mut binary_name = String::new();
    let mut args = Vec::new();

    loop {
        let end = rest
            .find(|c| matches!(c, ';' | '<' | '.'))
            .ok_or_else(|| invalid(whole))?;
        if end == 0 {
            return Err(invalid(whole));
        }
        binary_name.push_str(&rest[..end].replace('/', "."));
        rest = &rest[end..];

        // Arguments on outer segments are dropped; only the leaf's are kept.
        args.clear();
        if let Some(after) = rest.strip_prefix('<') {
            rest = after;
            loop {
                if let Some(after) = rest.strip_prefix('>') {
                    rest = after;
                    break;
                }
                let (arg, after) = parse_type_argument(rest, whole)?;
                args.push(arg);
                rest = after;
            }
        }

        if let Some(after) = rest.strip_prefix(';') {
            return Ok((TypeSignature::Class { binary_name, args }, after));
        }
        if let Some(after) = rest.strip_prefix('.') {
            binary_name.push('$');
            rest = after;
            continue;
        }
        return Err(invalid(whole));
    }
}

fn parse_type_argument<'a>(input: &'a str, whole: &str) -> Result<(TypeArgument, &'a str)> {
    if let Some(rest) = input.strip_prefix('*') {
        return Ok((TypeArgument::Any, rest));
    }
    if let Some(rest) = input.strip_prefix('+') {
        let (ty, rest) = parse_type(rest, whole)?;
        return Ok((TypeArgument::Extends(ty), rest));
    }
    if let Some(rest) = input.strip_prefix('-') {
        let (ty, rest) = parse_type(rest, whole)?;
        return Ok((TypeArgument::Super(ty), rest));
    }
    let (ty, rest) = parse_type(input, whole)?;
    Ok((TypeArgument::Exact(ty), rest))
}

fn invalid(input: &str) -> DescriptorError {
    DescriptorError::InvalidDescriptor(input.to_owned())
}

fn trailing(input: &str, rest: &str) -> DescriptorError {
    DescriptorError::TrailingInput {
        input: input.to_owned(),
        rest: rest.to_owned(),
    }
}
