//! Parser for the Matter IDL (`.matter`) format.
//!
//! Only identifier-bearing elements are retained: clusters, attributes,
//! commands, command responses and events. Type declarations (enums,
//! bitmaps, regular and request structs) and endpoint composition blocks
//! are recognized and skipped so that complete IDL files can be loaded.

use std::collections::HashSet;

use miette::{Diagnostic, NamedSource, SourceSpan};
use nom::{
    branch::alt,
    bytes::complete::{escaped, is_not, tag, tag_no_case, take_until, take_while, take_while1},
    character::complete::{digit1, hex_digit1, multispace1, one_of, space1},
    combinator::{map, map_opt, opt, recognize, value},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{delimited, preceded, tuple},
    IResult, Parser,
};
use nom_greedyerror::GreedyError;
use nom_locate::LocatedSpan;
use nom_supreme::ParserExt;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    ApiMaturity, Attribute, Cluster, Command, CommandResponse, DataType, Event, EventPriority,
};

// easier to type and not move str around
type Span<'a> = LocatedSpan<&'a str>;
type ParseError<'a> = GreedyError<Span<'a>, ErrorKind>;

/// Fetch the deepest location of an error within an error type
pub trait DeepestIndex {
    fn deepest_index(&self) -> Option<usize>;
}

impl<E> DeepestIndex for nom::Err<E>
where
    E: DeepestIndex,
{
    fn deepest_index(&self) -> Option<usize> {
        match self {
            nom::Err::Error(e) => e.deepest_index(),
            nom::Err::Failure(e) => e.deepest_index(),
            nom::Err::Incomplete(_) => None,
        }
    }
}

impl DeepestIndex for GreedyError<Span<'_>, ErrorKind> {
    fn deepest_index(&self) -> Option<usize> {
        self.errors.iter().map(|(p, _k)| p.location_offset()).max()
    }
}

/// Keep track of the deepest error encoutered
#[derive(Debug, PartialEq, Clone)]
struct DeepestError<E> {
    deepest: Option<(usize, E)>,
}

impl<E> DeepestError<E>
where
    E: DeepestIndex + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self { deepest: None }
    }

    pub fn or(self, e: E) -> E {
        match self.deepest {
            Some((depth, myerror)) if e.deepest_index().unwrap_or(0) <= depth => myerror,
            _ => e,
        }
    }

    pub fn intercept<O>(&mut self, data: Result<O, E>) -> Result<O, E> {
        if let Err(ref e) = data {
            if let Some(depth) = e.deepest_index() {
                let current_depth = self.deepest.as_ref().map(|(d, _)| *d).unwrap_or(0);
                if current_depth < depth {
                    self.deepest = Some((depth, e.clone()));
                }
            };
        }
        data
    }
}

/// A parser that CANNOT fail
///
/// Note that it will consume no input if no maturity is specified
/// in which case it returns 'STABLE'
///
/// Examples:
///
/// ```
/// use matter_ids_data_model::ApiMaturity;
/// use matter_ids_data_model::idl::api_maturity;
///
/// assert_eq!(
///    api_maturity("123".into()),
///    Ok(("123".into(), ApiMaturity::Stable))
/// );
///
/// let result = api_maturity("deprecated 123".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), " 123");
/// assert_eq!(result.1, ApiMaturity::Deprecated);
/// ```
pub fn api_maturity(span: Span) -> IResult<Span, ApiMaturity, ParseError> {
    for (keyword, maturity) in [
        ("stable", ApiMaturity::Stable),
        ("provisional", ApiMaturity::Provisional),
        ("internal", ApiMaturity::Internal),
        ("deprecated", ApiMaturity::Deprecated),
    ] {
        if let Ok((rest, _)) = keyword_tag(keyword).parse(span) {
            return Ok((rest, maturity));
        }
    }

    Ok((span, ApiMaturity::Stable))
}

/// Matches `keyword` case-insensitively, refusing to match a prefix of a
/// longer identifier (so `optional` does not match `optionalValue`).
fn keyword_tag<'a>(
    keyword: &'static str,
) -> impl Fn(Span<'a>) -> IResult<Span<'a>, Span<'a>, ParseError<'a>> {
    move |span| {
        let (rest, matched) = tag_no_case(keyword).parse(span)?;
        match rest.fragment().chars().next() {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => Err(nom::Err::Error(
                nom::error::ParseError::from_error_kind(span, ErrorKind::Tag),
            )),
            _ => Ok((rest, matched)),
        }
    }
}

/// Parses a hex-formated integer
///
/// Examples:
///
/// ```
/// use matter_ids_data_model::idl::hex_integer;
///
/// let result = hex_integer("0x12 abc".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), " abc");
/// assert_eq!(result.1, 0x12);
///
/// let result = hex_integer("0X0000FFFD;".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), ";");
/// assert_eq!(result.1, 0xFFFD);
/// ```
pub fn hex_integer(span: Span) -> IResult<Span, u64, ParseError> {
    map_opt(
        hex_digit1::<Span, ParseError>.preceded_by(tag_no_case("0x")),
        |r: Span| u64::from_str_radix(r.fragment(), 16).ok(),
    )
    .parse(span)
}

/// Parses a decimal-formated integer
///
/// Examples:
///
/// ```
/// use matter_ids_data_model::idl::decimal_integer;
///
/// let result = decimal_integer("65533;".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), ";");
/// assert_eq!(result.1, 65533);
/// ```
pub fn decimal_integer(span: Span) -> IResult<Span, u64, ParseError> {
    map_opt(digit1::<Span, ParseError>, |s: Span| {
        s.fragment().parse::<u64>().ok()
    })
    .parse(span)
}

/// Parses a positive integer (hex or decimal)
///
/// Examples:
///
/// ```
/// use matter_ids_data_model::idl::positive_integer;
///
/// let result = positive_integer("12 abc".into()).expect("Valid");
/// assert_eq!(result.1, 12);
///
/// let result = positive_integer("0x12abctest".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), "test");
/// assert_eq!(result.1, 0x12abc);
/// ```
pub fn positive_integer(span: Span) -> IResult<Span, u64, ParseError> {
    // NOTE: order is important so that
    // 0x123 is a hex not 0 followed by "x123"
    if let Ok(r) = hex_integer.parse(span) {
        return Ok(r);
    }
    decimal_integer.parse(span)
}

/// Represents a comment (i.e. something between `/** ... */`)
///
/// Typically placed before some element (e.g. cluster or command) to serve
/// as documentation for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocComment<'a>(pub &'a str);

/// Information returned while parsing whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Whitespace<'a> {
    DocComment(&'a str), // /** ... */
    CppComment(&'a str), // /* ... */ (and NOT a doc comment)
    CComment(&'a str),   // // ....
    Whitespace(&'a str), // general newline/space/tab
}

/// Parses whitespace (space/tab/newline and comments).
///
/// returns the content of the comment
pub fn whitespace_group(span: Span) -> IResult<Span, Whitespace<'_>, ParseError> {
    // NOTE: split into cases intentional. Using an ALT pattern here
    //       seems to slow down things quite a bit (as whitespace is used a lot
    //       inside our parsing)

    if let Ok((span, c)) = preceded(tag::<_, _, ()>("//"), opt(is_not("\n\r"))).parse(span) {
        let comment = c.map(|c| *c.fragment()).unwrap_or("");
        return Ok((span, Whitespace::CComment(comment)));
    }

    if let Ok((span, cpp)) =
        delimited(tag::<_, _, ()>("/*"), take_until("*/"), tag("*/")).parse(span)
    {
        return Ok((
            span,
            if cpp.starts_with('*') {
                Whitespace::DocComment(&cpp.fragment()[1..])
            } else {
                Whitespace::CppComment(cpp.fragment())
            },
        ));
    }

    multispace1
        .map(|c: Span| Whitespace::Whitespace(c.fragment()))
        .parse(span)
}

/// Parses 0 or more whitespaces.
/// It can NEVER fail.
///
/// If the last comment whitespace is a doc-comment, returns
/// that doc-comment.
///
/// Examples:
///
/// ```
/// use matter_ids_data_model::idl::{whitespace0, DocComment};
///
/// let result = whitespace0(" /*comment*/\n12 abc".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), "12 abc");
/// assert_eq!(result.1, None);
///
/// let result = whitespace0(" /**doc comment*/\n abc".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), "abc");
/// assert_eq!(result.1, Some(DocComment("doc comment")));
/// ```
pub fn whitespace0(span: Span) -> IResult<Span, Option<DocComment>, ParseError> {
    // Whitespace is only tab/newline/space or `/` for cpp/c comments
    match span.chars().next() {
        Some('\r' | '\n' | '\t' | ' ' | '/') => (),
        _ => return Ok((span, None)),
    }

    let mut rest = span;
    let mut doc = None;

    while let Ok((tail, whitespace)) = whitespace_group(rest) {
        rest = tail;
        match whitespace {
            Whitespace::DocComment(comment) => doc = Some(DocComment(comment)),
            Whitespace::CComment(_) | Whitespace::CppComment(_) => doc = None,
            Whitespace::Whitespace(_) => {}
        }
    }

    Ok((rest, doc))
}

/// Parses at least one whitespace
/// If the last comment whitespace is a doccomment, then
/// It returns that doc comment.
pub fn whitespace1(span: Span) -> IResult<Span, Option<DocComment>, ParseError> {
    let parsed = whitespace0(span)?;

    if span == parsed.0 {
        // this WILL fail, using it as such just to get a proper error
        space1::<_, ParseError>(span)?;
    }

    Ok(parsed)
}

/// Parses a name id, of the form /[a-zA-Z_][a-zA-Z0-9_]*/
pub fn parse_id(span: Span) -> IResult<Span, &str, ParseError> {
    let valid_first = |c: char| c.is_ascii_alphabetic() || c == '_';
    let valid_second = |c: char| c.is_ascii_alphanumeric() || c == '_';
    map(
        recognize(tuple((take_while1(valid_first), take_while(valid_second)))),
        |data: Span| *data.fragment(),
    )(span)
}

/// Grabs a tag set which are whitespace-separated list of items
///
/// Returns the remaining span and a HashSet of the lower-cased tags seen.
macro_rules! tags_set {
    ($span:ident, $($tags:expr),+) => {{
        let mut result = HashSet::new();
        let mut rest = $span;
        loop {
           let mut element_start = rest;
           if !result.is_empty() {
               match whitespace1.parse(element_start) {
                   Ok((p, _)) => element_start = p,
                   Err(_) => break,
               }
           }

           $(
           if let Ok((tail, tag)) = keyword_tag($tags).parse(element_start) {
               rest = tail;
               result.insert(tag.fragment().to_ascii_lowercase());
               continue;
           } else
           )+
           {
              break;
           }
        }
        (rest, result)
    }
    };
}

/// Consumes a double-quoted string, honoring backslash escapes.
fn string_literal(span: Span) -> IResult<Span, (), ParseError> {
    value(
        (),
        delimited(
            tag("\""),
            opt(escaped(is_not("\\\""), '\\', one_of("\"\\nrt"))),
            tag("\""),
        ),
    )
    .parse(span)
}

/// Consumes a `{ ... }` block including nested blocks and comments.
///
/// Used for the bodies of declarations whose content carries no
/// identifiers (enums, bitmaps, structs, event fields, endpoints).
pub fn braced_block(span: Span) -> IResult<Span, (), ParseError> {
    let (mut span, _) = tag("{").parse(span)?;

    loop {
        let (rest, _) = whitespace0(span)?;

        if let Ok((rest, _)) = tag::<_, _, ParseError>("}").parse(rest) {
            return Ok((rest, ()));
        }

        if rest.fragment().starts_with('{') {
            let (rest, _) = braced_block(rest)?;
            span = rest;
            continue;
        }

        if rest.fragment().starts_with('"') {
            let (rest, _) = string_literal(rest)?;
            span = rest;
            continue;
        }

        // anything up to the next structural character or comment start
        let (rest, _) = is_not("{}/\" \t\r\n").parse(rest)?;
        span = rest;
    }
}

/// Parses an IDL type declaration that does not carry wire identifiers and
/// returns its name.
///
/// Handles `enum X : base {..}`, `bitmap X : base {..}` and
/// `[request] [fabric_scoped] struct X {..}`, optionally prefixed by `shared`.
///
/// Examples:
///
/// ```
/// use matter_ids_data_model::idl::type_declaration;
///
/// let parsed = type_declaration("enum StartUpOnOffEnum : enum8 {
///     kOff = 0;
///     kOn = 1;
/// } tail".into()).expect("valid");
/// assert_eq!(parsed.0.fragment().to_string(), " tail");
/// assert_eq!(parsed.1, "StartUpOnOffEnum");
///
/// let parsed = type_declaration("request struct OnRequest { int8u x = 0; }".into()).expect("valid");
/// assert_eq!(parsed.1, "OnRequest");
/// ```
pub fn type_declaration(span: Span) -> IResult<Span, &str, ParseError> {
    let (span, _) = opt(tuple((keyword_tag("shared"), whitespace1))).parse(span)?;

    if let Ok((rest, name)) = tuple((
        alt((keyword_tag("enum"), keyword_tag("bitmap"))),
        whitespace1,
        parse_id,
        tuple((whitespace0, tag(":"), whitespace0, parse_id, whitespace0)),
        braced_block,
    ))
    .map(|(_, _, name, _, _)| name)
    .parse(span)
    {
        return Ok((rest, name));
    }

    let (span, _) = opt(tuple((keyword_tag("request"), whitespace1))).parse(span)?;
    let (span, _) = tags_set!(span, "fabric_scoped");

    tuple((
        whitespace0,
        keyword_tag("struct"),
        whitespace1,
        parse_id,
        whitespace0,
        braced_block,
    ))
    .map(|(_, _, _, name, _, _)| name)
    .parse(span)
}

/// Parses `response struct Name = code { ... }` after doc comment and
/// maturity have been consumed.
fn parse_response_after_doc_maturity<'a>(
    doc_comment: Option<&str>,
    maturity: ApiMaturity,
    span: Span<'a>,
) -> IResult<Span<'a>, CommandResponse, ParseError<'a>> {
    tuple((
        keyword_tag("response"),
        whitespace1,
        keyword_tag("struct"),
        whitespace1,
        parse_id,
        tuple((whitespace0, tag("="), whitespace0)),
        positive_integer,
        whitespace0,
        braced_block,
    ))
    .map(|(_, _, _, _, id, _, code, _, _)| CommandResponse {
        doc_comment: doc_comment.map(|c| c.into()),
        maturity,
        id: id.into(),
        code,
    })
    .parse(span)
}

pub fn parse_response(span: Span) -> IResult<Span, CommandResponse, ParseError> {
    let (span, doc_comment) = whitespace0.parse(span)?;
    let doc_comment = doc_comment.map(|DocComment(s)| s);
    let (span, maturity) = delimited(whitespace0, api_maturity, whitespace0).parse(span)?;

    parse_response_after_doc_maturity(doc_comment, maturity, span)
}

/// A typed and named field: `[optional] [nullable] type<len> name[] = code`
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypedField<'a> {
    data_type: DataType,
    id: &'a str,
    code: u64,
    is_optional: bool,
    is_nullable: bool,
}

fn typed_field(span: Span) -> IResult<Span, TypedField, ParseError> {
    let (span, _) = delimited(whitespace0, api_maturity, whitespace0).parse(span)?;
    let (span, qualities) = tags_set!(span, "optional", "nullable", "fabric_sensitive");

    tuple((
        whitespace0,
        parse_id,
        opt(tuple((
            whitespace0,
            tag("<"),
            whitespace0,
            positive_integer,
            whitespace0,
            tag(">"),
        ))
        .map(|(_, _, _, len, _, _)| len)),
        whitespace1,
        parse_id,
        whitespace0,
        opt(tuple((tag("["), whitespace0, tag("]"), whitespace0))),
        tag("="),
        whitespace0,
        positive_integer,
    ))
    .map(
        |(_, type_name, max_length, _, id, _, list_marker, _, _, code)| TypedField {
            data_type: DataType {
                name: type_name.into(),
                is_list: list_marker.is_some(),
                max_length,
            },
            id,
            code,
            is_optional: qualities.contains("optional"),
            is_nullable: qualities.contains("nullable"),
        },
    )
    .parse(span)
}

/// Parses `access(...)` with entries such as `read: view` or
/// `invoke: administer`. Privileges are not part of an identifier and are
/// only validated syntactically.
fn access_clause(span: Span) -> IResult<Span, (), ParseError> {
    let privilege = alt((
        keyword_tag("view"),
        keyword_tag("operate"),
        keyword_tag("manage"),
        keyword_tag("administer"),
    ));
    let entry = tuple((
        alt((
            keyword_tag("read"),
            keyword_tag("write"),
            keyword_tag("invoke"),
        )),
        whitespace0,
        tag(":"),
        whitespace0,
        privilege,
    ));

    value(
        (),
        tuple((
            keyword_tag("access"),
            whitespace0,
            tag("("),
            whitespace0,
            separated_list0(tuple((whitespace0, tag(","), whitespace0)), entry),
            whitespace0,
            tag(")"),
        )),
    )
    .parse(span)
}

pub fn event_priority(span: Span) -> IResult<Span, EventPriority, ParseError> {
    alt((
        value(EventPriority::Info, keyword_tag("info")),
        value(EventPriority::Critical, keyword_tag("critical")),
        value(EventPriority::Debug, keyword_tag("debug")),
    ))
    .parse(span)
}

pub fn parse_event(span: Span) -> IResult<Span, Event, ParseError> {
    let (span, doc_comment) = whitespace0.parse(span)?;
    let doc_comment = doc_comment.map(|DocComment(s)| s);
    let (span, maturity) = delimited(whitespace0, api_maturity, whitespace0).parse(span)?;

    parse_event_after_doc_maturity(doc_comment, maturity, span)
}

fn parse_event_after_doc_maturity<'a>(
    doc_comment: Option<&str>,
    maturity: ApiMaturity,
    span: Span<'a>,
) -> IResult<Span<'a>, Event, ParseError<'a>> {
    let (span, attributes) = tags_set!(span, "fabric_sensitive");
    let is_fabric_sensitive = attributes.contains("fabric_sensitive");

    tuple((
        preceded(whitespace0, event_priority),
        tuple((whitespace1, keyword_tag("event"), whitespace0)),
        opt(access_clause),
        preceded(whitespace0, parse_id),
        preceded(
            tuple((whitespace0, tag("="), whitespace0)),
            positive_integer,
        ),
        preceded(whitespace0, braced_block),
    ))
    .map(|(priority, _, _, id, code, _)| Event {
        doc_comment: doc_comment.map(|c| c.into()),
        maturity,
        priority,
        id: id.into(),
        code,
        is_fabric_sensitive,
    })
    .parse(span)
}

pub fn parse_command(span: Span) -> IResult<Span, Command, ParseError> {
    let (span, doc_comment) = whitespace0.parse(span)?;
    let doc_comment = doc_comment.map(|DocComment(s)| s);
    let (span, maturity) = delimited(whitespace0, api_maturity, whitespace0).parse(span)?;

    parse_command_after_doc_maturity(doc_comment, maturity, span)
}

fn parse_command_after_doc_maturity<'a>(
    doc_comment: Option<&str>,
    maturity: ApiMaturity,
    span: Span<'a>,
) -> IResult<Span<'a>, Command, ParseError<'a>> {
    let (span, qualities) = tags_set!(span, "timed", "fabric");
    let is_timed = qualities.contains("timed");
    let is_fabric_scoped = qualities.contains("fabric");

    tuple((
        tuple((whitespace0, keyword_tag("command"), whitespace0)),
        opt(access_clause),
        whitespace0,
        parse_id,
        tuple((whitespace0, tag("("), whitespace0)),
        opt(parse_id),
        tuple((whitespace0, tag(")"), whitespace0, tag(":"), whitespace0)),
        parse_id,
        tuple((whitespace0, tag("="), whitespace0)),
        positive_integer,
        tuple((whitespace0, tag(";"))),
    ))
    .map(
        |(_, _, _, id, _, input, _, output, _, code, _)| Command {
            doc_comment: doc_comment.map(|c| c.into()),
            maturity,
            id: id.into(),
            input: input.map(|i| i.into()),
            output: output.into(),
            code,
            is_timed,
            is_fabric_scoped,
        },
    )
    .parse(span)
}

pub fn parse_attribute(span: Span) -> IResult<Span, Attribute, ParseError> {
    let (span, doc_comment) = whitespace0.parse(span)?;
    let doc_comment = doc_comment.map(|DocComment(s)| s);
    let (span, maturity) = delimited(whitespace0, api_maturity, whitespace0).parse(span)?;

    parse_attribute_after_doc_maturity(doc_comment, maturity, span)
}

fn parse_attribute_after_doc_maturity<'a>(
    doc_comment: Option<&str>,
    maturity: ApiMaturity,
    span: Span<'a>,
) -> IResult<Span<'a>, Attribute, ParseError<'a>> {
    let (span, qualities) = tags_set!(span, "readonly", "nosubscribe", "timedwrite");

    tuple((
        whitespace0,
        keyword_tag("attribute"),
        whitespace1,
        opt(access_clause),
        typed_field,
        whitespace0,
        tag(";"),
    ))
    .map(|(_, _, _, _, field, _, _)| Attribute {
        doc_comment: doc_comment.map(|c| c.into()),
        maturity,
        data_type: field.data_type,
        id: field.id.into(),
        code: field.code,
        is_read_only: qualities.contains("readonly"),
        is_optional: field.is_optional,
        is_nullable: field.is_nullable,
        is_timed_write: qualities.contains("timedwrite"),
    })
    .parse(span)
}

/// Parses one member of a cluster body into `c`.
///
/// Failures are recorded into `deepest` so that a broken member is
/// reported where it actually broke rather than at the cluster start.
fn parse_cluster_member<'a>(
    c: &mut Cluster,
    span: Span<'a>,
    deepest: &mut DeepestError<nom::Err<ParseError<'a>>>,
) -> Option<Span<'a>> {
    let (span, (doc_comment, maturity, _)) = tuple((
        whitespace0.map(|o| o.map(|DocComment(s)| s)),
        api_maturity,
        whitespace0,
    ))
    .parse(span)
    .ok()?;

    if let Ok((rest, revision)) = deepest.intercept(
        delimited(
            tuple((keyword_tag("revision"), whitespace1)),
            positive_integer,
            tuple((whitespace0, tag(";"))),
        )
        .parse(span),
    ) {
        c.revision = revision;
        return Some(rest);
    }

    if let Ok((rest, r)) =
        deepest.intercept(parse_response_after_doc_maturity(doc_comment, maturity, span))
    {
        c.responses.push(r);
        return Some(rest);
    }
    if let Ok((rest, name)) = deepest.intercept(type_declaration(span)) {
        trace!("Skipping type declaration {} in cluster {}", name, c.id);
        return Some(rest);
    }
    if let Ok((rest, a)) =
        deepest.intercept(parse_attribute_after_doc_maturity(doc_comment, maturity, span))
    {
        c.attributes.push(a);
        return Some(rest);
    }
    if let Ok((rest, cmd)) =
        deepest.intercept(parse_command_after_doc_maturity(doc_comment, maturity, span))
    {
        c.commands.push(cmd);
        return Some(rest);
    }
    if let Ok((rest, e)) =
        deepest.intercept(parse_event_after_doc_maturity(doc_comment, maturity, span))
    {
        c.events.push(e);
        return Some(rest);
    }
    None
}

pub fn parse_cluster(span: Span) -> IResult<Span, Cluster, ParseError> {
    let (span, doc_comment) = whitespace0.parse(span)?;
    let doc_comment = doc_comment.map(|DocComment(s)| s);

    let (span, maturity) = tuple((api_maturity, whitespace0))
        .map(|(m, _)| m)
        .parse(span)?;

    let (span, mut cluster) = delimited(
        tuple((
            opt(tuple((
                alt((keyword_tag("client"), keyword_tag("server"))),
                whitespace1,
            ))),
            keyword_tag("cluster"),
            whitespace1,
        )),
        tuple((
            parse_id,
            whitespace0,
            tag("="),
            whitespace0,
            positive_integer,
        )),
        whitespace0,
    )
    .map(|(id, _, _, _, code)| Cluster {
        doc_comment: doc_comment.map(|c| c.into()),
        maturity,
        id: id.into(),
        code,
        ..Default::default()
    })
    .parse(span)?;

    let mut deepest_error = DeepestError::new();

    let (mut span, _) = tag("{").parse(span)?;
    while let Some(rest) = parse_cluster_member(&mut cluster, span, &mut deepest_error) {
        span = rest;
    }

    match value((), tuple((whitespace0, tag("}")))).parse(span) {
        Ok((rest, _)) => {
            debug!(
                "Parsed cluster {} (0x{:04X}): {} attributes, {} commands, {} responses, {} events",
                cluster.id,
                cluster.code,
                cluster.attributes.len(),
                cluster.commands.len(),
                cluster.responses.len(),
                cluster.events.len()
            );
            Ok((rest, cluster))
        }
        Err(e) => Err(deepest_error.or(e)),
    }
}

/// Skips an endpoint composition block (`endpoint N { ... }`).
///
/// Endpoint instantiation references clusters by name and carries no new
/// identifiers.
pub fn endpoint_block(span: Span) -> IResult<Span, u64, ParseError> {
    tuple((
        keyword_tag("endpoint"),
        whitespace1,
        positive_integer,
        whitespace0,
        braced_block,
    ))
    .map(|(_, _, id, _, _)| id)
    .parse(span)
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Default)]
pub struct Idl {
    pub clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum InternalIdlParsedData {
    Cluster(Cluster),
    Skipped,
}

#[derive(Error, Debug, Diagnostic)]
#[error("Failed to parse IDL.")]
#[diagnostic(
    code("matter_ids::idl::parse::failure"),
    help("Failed to parse IDL. Check IDL format")
)]
pub struct IdlParsingError {
    #[source_code]
    pub src: NamedSource,

    #[label("Parse error location")]
    pub error_location: SourceSpan,
}

impl IdlParsingError {
    fn from<'a>(
        name: &str,
        input: Span<'a>,
        span: Span<'a>,
        error: nom::Err<ParseError<'a>>,
    ) -> Self {
        let pos = match error.deepest_index() {
            None => input.len() - span.len(),
            Some(error_pos) => error_pos,
        };

        warn!("IDL parse error: {:?}", error);

        IdlParsingError {
            src: NamedSource::new(name, input.fragment().to_string()),
            error_location: (pos, 1).into(),
        }
    }
}

impl Idl {
    pub fn parse(input: Span) -> Result<Idl, IdlParsingError> {
        Self::parse_named("input idl", input)
    }

    /// Parses `input`, using `name` as the source name in diagnostics.
    pub fn parse_named(name: &str, input: Span) -> Result<Idl, IdlParsingError> {
        let mut idl = Idl::default();

        let mut span = input;
        while !span.is_empty() {
            let (rest, r) = alt((
                parse_cluster.map(InternalIdlParsedData::Cluster),
                preceded(whitespace0, type_declaration).map(|_| InternalIdlParsedData::Skipped),
                preceded(whitespace0, endpoint_block).map(|_| InternalIdlParsedData::Skipped),
                value(InternalIdlParsedData::Skipped, whitespace1),
            ))
            .parse(span)
            .map_err(|e| IdlParsingError::from(name, input, span, e))?;

            if let InternalIdlParsedData::Cluster(c) = r {
                idl.clusters.push(c);
            }
            span = rest;
        }

        debug!("Parsed {} clusters from {}", idl.clusters.len(), name);

        Ok(idl)
    }

    pub fn find_cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == name)
    }

    pub fn find_cluster_by_code(&self, code: u64) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.code == code)
    }
}
