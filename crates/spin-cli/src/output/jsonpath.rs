//! Kubernetes-style JSONPath templates.
//!
//! A template is literal text with `{...}` actions. An action is a path, a
//! quoted string literal such as `{"\n"}`, or a `{range <path>}` ... `{end}`
//! block. Paths understand `$`, `@`, `.field`, `['field']`, `[n]`,
//! `[start:end:step]`, `*`, `..`, unions (`[0,2]`, `['a','b']`) and filters
//! (`[?(@.type == "kubernetes")]`, `[?(@.port)]`).
//!
//! A path prints its first match: strings raw, everything else as pretty
//! JSON. A `range` renders its body once per match with `@` bound to it.
//! Missing keys and paths that match nothing are errors.

use std::cmp::Ordering;

use anyhow::{anyhow, bail};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Text(String),
    Expr(Path),
    Range { path: Path, body: Vec<Node> },
}

/// One `{...}` action before ranges are nested.
enum Action {
    Node(Node),
    Range(Path),
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Path {
    source: String,
    from_root: bool,
    steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    Child(String),
    Index(i64),
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: usize,
    },
    Wildcard,
    Recursive,
    Union(Vec<Step>),
    Filter(Filter),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Filter {
    left: Path,
    comparison: Option<(Comparison, Operand)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Operand {
    Path(Path),
    Literal(Value),
}

const OPERATORS: [(&str, Comparison); 6] = [
    ("==", Comparison::Equal),
    ("!=", Comparison::NotEqual),
    ("<=", Comparison::LessOrEqual),
    (">=", Comparison::GreaterOrEqual),
    ("<", Comparison::Less),
    (">", Comparison::Greater),
];

impl Template {
    /// Parse a template. Text without braces is one bare expression.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        if !raw.contains('{') {
            return Ok(Self {
                nodes: vec![Node::Expr(Path::parse(raw)?)],
            });
        }

        let mut frames: Vec<Vec<Node>> = vec![Vec::new()];
        let mut ranges: Vec<Path> = Vec::new();
        let mut rest = raw;
        while let Some(open) = rest.find('{') {
            if open > 0 {
                push(&mut frames, Node::Text(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = find_top_level(after, '}')
                .ok_or_else(|| anyhow!("unclosed '{{' in jsonpath template '{raw}'"))?;
            match Action::parse(&after[..close])? {
                Action::Node(node) => push(&mut frames, node),
                Action::Range(path) => {
                    ranges.push(path);
                    frames.push(Vec::new());
                }
                Action::End => {
                    let path = ranges.pop().ok_or_else(|| {
                        anyhow!("'end' without 'range' in jsonpath template '{raw}'")
                    })?;
                    let body = frames.pop().unwrap_or_default();
                    push(&mut frames, Node::Range { path, body });
                }
            }
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            push(&mut frames, Node::Text(rest.to_string()));
        }
        if !ranges.is_empty() {
            bail!("'range' without 'end' in jsonpath template '{raw}'");
        }

        Ok(Self {
            nodes: frames.pop().unwrap_or_default(),
        })
    }

    pub fn render(&self, document: &Value) -> anyhow::Result<String> {
        let mut out = String::new();
        render_nodes(&self.nodes, document, document, &mut out)?;
        Ok(out)
    }
}

fn push(frames: &mut [Vec<Node>], node: Node) {
    if let Some(frame) = frames.last_mut() {
        frame.push(node);
    }
}

fn render_nodes(
    nodes: &[Node],
    root: &Value,
    current: &Value,
    out: &mut String,
) -> anyhow::Result<()> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Expr(path) => {
                let matches = path.evaluate(root, current)?;
                let first = matches
                    .first()
                    .ok_or_else(|| anyhow!("jsonpath '{}' matched nothing", path.source))?;
                match first {
                    Value::String(s) => out.push_str(s),
                    other => out.push_str(&serde_json::to_string_pretty(other)?),
                }
            }
            Node::Range { path, body } => {
                for item in path.evaluate(root, current)? {
                    render_nodes(body, root, item, out)?;
                }
            }
        }
    }
    Ok(())
}

impl Action {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        let action = raw.trim();
        if action == "end" {
            return Ok(Self::End);
        }
        if let Some(path) = action
            .strip_prefix("range")
            .filter(|rest| rest.starts_with(char::is_whitespace))
        {
            return Ok(Self::Range(Path::parse(path)?));
        }
        if action.starts_with(['"', '\'']) {
            let text = unquote(action)
                .ok_or_else(|| anyhow!("invalid string literal {action} in jsonpath template"))?;
            return Ok(Self::Node(Node::Text(text)));
        }
        Ok(Self::Node(Node::Expr(Path::parse(action)?)))
    }
}

/// Characters of `s` outside quotes and nested brackets, with byte offsets.
/// An opening bracket at the top level is yielded; its contents are not.
fn top_level(s: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote = None;
    let mut escaped = false;
    let mut depth = 0usize;
    s.char_indices().filter(move |&(_, c)| {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            return false;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                false
            }
            '[' | '(' => {
                depth += 1;
                depth == 1
            }
            ']' | ')' if depth > 0 => {
                depth -= 1;
                false
            }
            _ => depth == 0,
        }
    })
}

fn find_top_level(s: &str, target: char) -> Option<usize> {
    top_level(s).find(|&(_, c)| c == target).map(|(i, _)| i)
}

fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(i) = find_top_level(rest, separator) {
        parts.push(&rest[..i]);
        rest = &rest[i + separator.len_utf8()..];
    }
    parts.push(rest);
    parts
}

/// Strip one pair of matching quotes and resolve backslash escapes. `None`
/// unless `raw` is exactly one quoted string.
fn unquote(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let quote = chars.next().filter(|c| matches!(c, '\'' | '"'))?;
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(match chars.next()? {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            }),
            c if c == quote => return chars.next().is_none().then_some(out),
            c => out.push(c),
        }
    }
    None
}

fn is_field_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '.' | '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | ',' | '*'
        )
}

fn take_field<'a>(s: &'a str, i: &mut usize) -> &'a str {
    let start = *i;
    let end = s[start..]
        .char_indices()
        .find(|&(_, c)| !is_field_char(c))
        .map_or(s.len(), |(offset, _)| start + offset);
    *i = end;
    &s[start..end]
}

impl Path {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        let source = raw.trim().to_string();
        let s = source.as_str();
        let bytes = s.as_bytes();
        let mut steps = Vec::new();
        let mut from_root = false;
        let mut i = 0;
        match bytes.first() {
            Some(b'$') => {
                from_root = true;
                i = 1;
            }
            Some(b'@') => i = 1,
            _ => {}
        }

        while i < s.len() {
            match bytes[i] {
                b'.' if bytes.get(i + 1) == Some(&b'.') => {
                    steps.push(Step::Recursive);
                    i += 2;
                    match bytes.get(i) {
                        Some(b'*') => {
                            i += 1;
                            steps.push(Step::Wildcard);
                        }
                        Some(b'[') => {}
                        _ => {
                            let name = take_field(s, &mut i);
                            if name.is_empty() {
                                bail!("expected a field name after '..' in jsonpath '{source}'");
                            }
                            steps.push(Step::Child(name.to_string()));
                        }
                    }
                }
                b'.' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'*') {
                        i += 1;
                        steps.push(Step::Wildcard);
                    } else {
                        let name = take_field(s, &mut i);
                        if !name.is_empty() {
                            steps.push(Step::Child(name.to_string()));
                        } else if i < s.len() && bytes[i] != b'[' {
                            bail!("expected a field name in jsonpath '{source}'");
                        }
                    }
                }
                b'[' => {
                    let inner_start = i + 1;
                    let close = find_top_level(&s[inner_start..], ']')
                        .ok_or_else(|| anyhow!("unclosed '[' in jsonpath '{source}'"))?;
                    let inner = s[inner_start..inner_start + close].trim();
                    steps.push(parse_bracket(inner, &source)?);
                    i = inner_start + close + 1;
                }
                _ => {
                    let name = if i == 0 { take_field(s, &mut i) } else { "" };
                    if name.is_empty() {
                        let c = s[i..].chars().next().unwrap_or_default();
                        bail!("unexpected '{c}' in jsonpath '{source}'");
                    }
                    steps.push(Step::Child(name.to_string()));
                }
            }
        }

        Ok(Self {
            source,
            from_root,
            steps,
        })
    }

    fn evaluate<'a>(&self, root: &'a Value, current: &'a Value) -> anyhow::Result<Vec<&'a Value>> {
        let mut values = vec![if self.from_root { root } else { current }];
        for step in &self.steps {
            values = step.apply(&values, root)?;
        }
        Ok(values)
    }
}

fn parse_bracket(inner: &str, source: &str) -> anyhow::Result<Step> {
    if let Some(filter) = inner.strip_prefix('?') {
        return Filter::parse(filter, source).map(Step::Filter);
    }
    let members = split_top_level(inner, ',');
    if members.len() == 1 {
        return parse_subscript(inner, source);
    }
    members
        .into_iter()
        .map(|member| parse_subscript(member.trim(), source))
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Step::Union)
}

fn parse_subscript(inner: &str, source: &str) -> anyhow::Result<Step> {
    if inner == "*" {
        return Ok(Step::Wildcard);
    }
    if inner.starts_with(['\'', '"']) {
        return unquote(inner)
            .map(Step::Child)
            .ok_or_else(|| anyhow!("invalid key {inner} in jsonpath '{source}'"));
    }
    if inner.starts_with('?') {
        bail!("a filter cannot be part of a union in jsonpath '{source}'");
    }
    if inner.starts_with('(') {
        bail!("script expressions are not supported in jsonpath '{source}'");
    }
    if inner.contains(':') {
        let bounds: Vec<&str> = inner.split(':').collect();
        if bounds.len() > 3 {
            bail!("invalid slice '[{inner}]' in jsonpath '{source}'");
        }
        let bound = |raw: &str| -> anyhow::Result<Option<i64>> {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse()
                .map(Some)
                .map_err(|_| anyhow!("invalid slice bound '{raw}' in jsonpath '{source}'"))
        };
        let step = bound(bounds.get(2).copied().unwrap_or_default())?.unwrap_or(1);
        if step <= 0 {
            bail!("slice step must be positive in jsonpath '{source}'");
        }
        return Ok(Step::Slice {
            start: bound(bounds[0])?,
            end: bound(bounds[1])?,
            step: usize::try_from(step)?,
        });
    }
    inner
        .parse()
        .map(Step::Index)
        .map_err(|_| anyhow!("invalid subscript '[{inner}]' in jsonpath '{source}'"))
}

impl Filter {
    /// Parse the text after `?`: `(@.path)` or `(@.path <op> <operand>)`.
    fn parse(raw: &str, source: &str) -> anyhow::Result<Self> {
        let body = raw
            .trim()
            .strip_prefix('(')
            .and_then(|body| body.strip_suffix(')'))
            .ok_or_else(|| anyhow!("filters are written [?(...)] in jsonpath '{source}'"))?
            .trim();

        let comparison = top_level(body).find_map(|(i, _)| {
            OPERATORS
                .iter()
                .find(|(token, _)| body[i..].starts_with(token))
                .map(|&(token, comparison)| (i, token.len(), comparison))
        });
        let Some((at, width, comparison)) = comparison else {
            return Ok(Self {
                left: parse_relative(body, source)?,
                comparison: None,
            });
        };

        Ok(Self {
            left: parse_relative(body[..at].trim(), source)?,
            comparison: Some((comparison, Operand::parse(body[at + width..].trim(), source)?)),
        })
    }

    fn matches(&self, root: &Value, item: &Value) -> bool {
        let Some(left) = first_match(&self.left, root, item) else {
            return false;
        };
        let Some((comparison, operand)) = &self.comparison else {
            return true;
        };
        let right = match operand {
            Operand::Literal(value) => value,
            Operand::Path(path) => match first_match(path, root, item) {
                Some(value) => value,
                None => return false,
            },
        };
        comparison.holds(left, right)
    }
}

fn parse_relative(raw: &str, source: &str) -> anyhow::Result<Path> {
    if !raw.starts_with('@') {
        bail!("filter operands must start with '@' in jsonpath '{source}'");
    }
    Path::parse(raw)
}

/// Inside a filter a missing key is simply no match.
fn first_match<'a>(path: &Path, root: &'a Value, current: &'a Value) -> Option<&'a Value> {
    path.evaluate(root, current).ok()?.into_iter().next()
}

impl Operand {
    fn parse(raw: &str, source: &str) -> anyhow::Result<Self> {
        if raw.starts_with(['@', '$']) {
            return Path::parse(raw).map(Self::Path);
        }
        if raw.starts_with('\'') {
            return unquote(raw)
                .map(|text| Self::Literal(Value::String(text)))
                .ok_or_else(|| anyhow!("invalid string {raw} in jsonpath '{source}'"));
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) if !value.is_array() && !value.is_object() => Ok(Self::Literal(value)),
            _ => bail!("invalid filter operand '{raw}' in jsonpath '{source}'"),
        }
    }
}

impl Comparison {
    fn holds(self, left: &Value, right: &Value) -> bool {
        let ordering = match (left, right) {
            (Value::Number(l), Value::Number(r)) => l
                .as_f64()
                .zip(r.as_f64())
                .and_then(|(l, r)| l.partial_cmp(&r)),
            (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
            _ => (left == right).then_some(Ordering::Equal),
        };
        match self {
            Self::Equal => ordering == Some(Ordering::Equal),
            Self::NotEqual => ordering != Some(Ordering::Equal),
            Self::Less => ordering == Some(Ordering::Less),
            Self::LessOrEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::Greater => ordering == Some(Ordering::Greater),
            Self::GreaterOrEqual => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
        }
    }
}

impl Step {
    fn apply<'a>(&self, inputs: &[&'a Value], root: &'a Value) -> anyhow::Result<Vec<&'a Value>> {
        let mut out = Vec::new();
        match self {
            Self::Child(name) => {
                out.extend(
                    inputs
                        .iter()
                        .copied()
                        .filter_map(|value| value.as_object()?.get(name)),
                );
                if out.is_empty() {
                    if inputs.iter().any(|value| value.is_object()) {
                        bail!("key '{name}' is not found");
                    }
                    if let Some(first) = inputs.first() {
                        bail!("cannot read key '{name}' from {}", kind(first));
                    }
                }
            }
            Self::Index(index) => {
                let lists = arrays(inputs, "index")?;
                out.extend(lists.iter().copied().filter_map(|items| {
                    resolve_index(*index, items.len()).and_then(|i| items.get(i))
                }));
                if out.is_empty() && !lists.is_empty() {
                    bail!("array index {index} is out of bounds");
                }
            }
            Self::Slice { start, end, step } => {
                for items in arrays(inputs, "slice")? {
                    let from = start.map_or(0, |s| clamp_bound(s, items.len()));
                    let to = end.map_or(items.len(), |e| clamp_bound(e, items.len()));
                    if from < to {
                        out.extend(items[from..to].iter().step_by(*step));
                    }
                }
            }
            Self::Wildcard => {
                for value in inputs.iter().copied() {
                    match value {
                        Value::Object(map) => out.extend(map.values()),
                        Value::Array(items) => out.extend(items),
                        _ => {}
                    }
                }
            }
            Self::Recursive => {
                for value in inputs.iter().copied() {
                    descendants(value, &mut out);
                }
            }
            Self::Union(members) => {
                for member in members {
                    out.extend(member.apply(inputs, root)?);
                }
            }
            Self::Filter(filter) => {
                for items in arrays(inputs, "filter")? {
                    out.extend(items.iter().filter(|item| filter.matches(root, item)));
                }
            }
        }
        Ok(out)
    }
}

/// The array inputs; an error only when there are inputs and none is an array.
fn arrays<'a>(inputs: &[&'a Value], action: &str) -> anyhow::Result<Vec<&'a Vec<Value>>> {
    let arrays: Vec<&'a Vec<Value>> = inputs.iter().copied().filter_map(Value::as_array).collect();
    match inputs.first() {
        Some(first) if arrays.is_empty() => bail!("cannot {action} {}", kind(first)),
        _ => Ok(arrays),
    }
}

fn descendants<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    out.push(value);
    match value {
        Value::Object(map) => map.values().for_each(|child| descendants(child, out)),
        Value::Array(items) => items.iter().for_each(|child| descendants(child, out)),
        _ => {}
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    (0..len)
        .contains(&resolved)
        .then(|| usize::try_from(resolved).ok())
        .flatten()
}

fn clamp_bound(bound: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if bound < 0 { len_i + bound } else { bound };
    usize::try_from(resolved.clamp(0, len_i)).unwrap_or(len)
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn app() -> Value {
        json!({
            "name": "checkout",
            "attributes": {
                "email": "team@example.com",
                "cloud-providers": "kubernetes",
                "instancePort": 80
            },
            "clusters": {
                "prod": [
                    {"name": "checkout-prod", "serverGroups": [{"name": "v001"}, {"name": "v002"}]}
                ]
            },
            "accounts": ["prod", "staging", "dev"],
            "servers": [
                {"name": "a", "type": "kubernetes", "port": 80},
                {"name": "b", "type": "ecs", "port": 8080},
                {"name": "c", "type": "kubernetes"}
            ]
        })
    }

    fn render(template: &str) -> anyhow::Result<String> {
        Template::parse(template)?.render(&app())
    }

    #[rstest]
    #[case("{.name}", "checkout")]
    #[case(".name", "checkout")]
    #[case("$.name", "checkout")]
    #[case("{$.attributes.email}", "team@example.com")]
    #[case("{.attributes['cloud-providers']}", "kubernetes")]
    #[case("{.attributes.cloud-providers}", "kubernetes")]
    #[case(r#"{.attributes["email"]}"#, "team@example.com")]
    #[case("{.attributes.instancePort}", "80")]
    #[case("{.accounts[0]}", "prod")]
    #[case("{.accounts[-1]}", "dev")]
    #[case("{.accounts[1:]}", "staging")]
    #[case("{.accounts[*]}", "prod")]
    #[case("{..serverGroups[1].name}", "v002")]
    #[case("{.clusters.*[0].name}", "checkout-prod")]
    fn first_match_is_rendered(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(template).expect("template should render"), expected);
    }

    #[rstest]
    #[case(r#"{.servers[?(@.type=="kubernetes")].name}"#, "a")]
    #[case(r#"{.servers[?(@.type != "kubernetes")].name}"#, "b")]
    #[case("{.servers[?(@.type=='ecs')].port}", "8080")]
    #[case("{.servers[?(@.port > 100)].name}", "b")]
    #[case("{.servers[?(@.port<100)].name}", "a")]
    #[case("{.servers[?(@.port>=8080)].name}", "b")]
    #[case("{.servers[?(@.port<=80)].name}", "a")]
    #[case("{.servers[?(@.port)].name}", "a")]
    #[case("{.servers[?(@.type == $.attributes.cloud-providers)].name}", "a")]
    #[case("{.servers[?(@.port == 8080.0)].name}", "b")]
    fn filters_select_elements(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(template).expect("template should render"), expected);
    }

    #[rstest]
    #[case("{range .servers[?(@.port)]}{.name},{end}", "a,b,")]
    #[case(r#"{range .servers[*]}{.name}={.type}{"\n"}{end}"#, "a=kubernetes\nb=ecs\nc=kubernetes\n")]
    #[case("{range .servers[*]}{$.name}/{@.name} {end}", "checkout/a checkout/b checkout/c ")]
    #[case("{range .accounts[0,2]}{@};{end}", "prod;dev;")]
    #[case("{range .servers[0]['name','type']}{@} {end}", "a kubernetes ")]
    #[case("{range .accounts[::2]}{@} {end}", "prod dev ")]
    #[case("{range .accounts[5:]}{@}{end}done", "done")]
    #[case(
        "{range .clusters.prod[*]}{.name}:{range .serverGroups[*]} {.name}{end}{end}",
        "checkout-prod: v001 v002"
    )]
    fn range_renders_body_per_match(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(template).expect("template should render"), expected);
    }

    #[test]
    fn union_yields_each_member() {
        assert_eq!(render("{.servers[1]['name','type']}").unwrap(), "b");
        assert_eq!(render("{.accounts[2,0]}").unwrap(), "dev");
    }

    #[rstest]
    #[case(r#"{.name}{"\n"}"#, "checkout\n")]
    #[case(r"{.name}{'\t'}{.attributes.email}", "checkout\tteam@example.com")]
    #[case(r#"{"name: "}{.name}"#, "name: checkout")]
    #[case(r#"{"{}"}"#, "{}")]
    fn string_literals_are_printed(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(template).expect("template should render"), expected);
    }

    #[test]
    fn literal_text_is_kept_between_expressions() {
        assert_eq!(
            render("app={.name} owner={.attributes.email}\n").expect("should render"),
            "app=checkout owner=team@example.com\n"
        );
    }

    #[test]
    fn non_string_matches_render_as_pretty_json() {
        assert_eq!(
            render("{.clusters.prod[0].serverGroups[0]}").expect("should render"),
            "{\n  \"name\": \"v001\"\n}"
        );
        let doc = json!({"items": []});
        assert_eq!(
            Template::parse("{.items}").unwrap().render(&doc).unwrap(),
            "[]"
        );
    }

    #[test]
    fn root_expression_renders_document() {
        let doc = json!({"a": 1});
        assert_eq!(
            Template::parse("{.}").unwrap().render(&doc).unwrap(),
            "{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn top_level_array_documents_can_be_filtered() {
        let doc = json!([
            {"name": "prod", "type": "kubernetes"},
            {"name": "lambda", "type": "aws"}
        ]);
        let show = |template: &str| Template::parse(template).unwrap().render(&doc).unwrap();
        assert_eq!(show(r#"{[?(@.type=="aws")].name}"#), "lambda");
        assert_eq!(show("{range [*]}{.name} {end}"), "prod lambda ");
    }

    #[rstest]
    #[case("{.missing}", "key 'missing' is not found")]
    #[case("{.accounts[7]}", "out of bounds")]
    #[case("{.name.first}", "cannot read key 'first' from a string")]
    #[case("{.name[0]}", "cannot index a string")]
    #[case("{..nowhere}", "key 'nowhere' is not found")]
    #[case("{.accounts[5:]}", "matched nothing")]
    #[case("{.servers[?(@.type=='lambda')].name}", "matched nothing")]
    #[case("{range .servers[*]}{.port} {end}", "key 'port' is not found")]
    fn evaluation_errors(#[case] template: &str, #[case] message: &str) {
        let err = render(template).expect_err("should fail");
        assert!(
            err.to_string().contains(message),
            "'{err}' should contain '{message}'"
        );
    }

    #[rstest]
    #[case("{.name")]
    #[case("{.items[0}")]
    #[case("{.items[a]}")]
    #[case("{.a..}")]
    #[case("{.items['a'b]}")]
    #[case("{.items['a',}")]
    #[case("{.items[(@.length-1)]}")]
    #[case("{.items[0,?(@.x)]}")]
    #[case("{.items[?@.x]}")]
    #[case("{.items[?(.x == 1)]}")]
    #[case("{.items[?(@.x == [1])]}")]
    #[case("{.items[?(@.x == bare)]}")]
    #[case("{.items[0:1:0]}")]
    #[case("{.items[1:2:3:4]}")]
    #[case("{range .items[*]}{.name}")]
    #[case("{.name}{end}")]
    #[case(r#"{"unterminated}"#)]
    fn syntax_errors(#[case] template: &str) {
        assert!(Template::parse(template).is_err(), "{template} should not parse");
    }
}
