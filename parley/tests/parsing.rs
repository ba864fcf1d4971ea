use parley::{
    ActionKind, Argument, ArgumentParser, Converter, NArgs, Namespace, ParseError, ParserBuilder,
    Value,
};
use pretty_assertions::assert_eq;

fn build(builder: ParserBuilder, arguments: Vec<Argument>) -> ArgumentParser {
    let mut parser = builder.width(78).build();
    for argument in arguments {
        parser.add_argument(argument).unwrap();
    }
    parser
}

fn prog() -> ParserBuilder {
    ArgumentParser::builder().prog("PROG")
}

fn strings(items: &[&str]) -> Value {
    Value::list(items.iter().map(|&item| Value::from(item)))
}

fn error_message(parser: &ArgumentParser, args: &[&str]) -> String {
    match parser.parse_args(args) {
        Ok(namespace) => panic!("expected an error, got {namespace:?}"),
        Err(ParseError::Argument(error)) => error.to_string(),
        Err(other) => panic!("expected an argument error, got {other:?}"),
    }
}

#[test]
fn test_required_option_and_positional() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--foo"]).required(true),
            Argument::new(["spam"]),
        ],
    );

    assert_eq!(parser.format_usage(), "usage: PROG [-h] --foo FOO spam\n");

    let namespace = parser.parse_args(["--foo", "1", "eggs"]).unwrap();
    assert_eq!(
        namespace,
        Namespace::from_iter([("foo", "1"), ("spam", "eggs")])
    );

    let error = parser.parse_args(["eggs"]).unwrap_err();
    assert_eq!(error.status(), 2);
    assert_eq!(
        parser.format_error(&error),
        "\
usage: PROG [-h] --foo FOO spam
PROG: error: the following arguments are required: --foo
"
    );

    assert_eq!(
        error_message(&parser, &[]),
        "the following arguments are required: --foo, spam"
    );
}

#[test]
fn test_defaults_are_seeded_in_order() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--name"]),
            Argument::new(["-q", "--quiet"]).action(ActionKind::StoreTrue),
            Argument::new(["--loud"]).action(ActionKind::StoreFalse),
            Argument::new(["-v"]).action(ActionKind::Count),
            Argument::new(["--level"]).default(3),
        ],
    );

    let namespace = parser.parse_args::<[&str; 0]>([]).unwrap();
    let keys: Vec<&str> = namespace.iter().map(|(dest, _)| dest).collect();

    assert_eq!(keys, ["name", "quiet", "loud", "v", "level"]);
    assert_eq!(namespace.get("name"), Some(&Value::None));
    assert_eq!(namespace.get("quiet"), Some(&Value::Bool(false)));
    assert_eq!(namespace.get("loud"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("v"), Some(&Value::None));
    assert_eq!(namespace.get("level"), Some(&Value::Int(3)));
}

#[test]
fn test_flag_actions() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["-q"]).action(ActionKind::StoreTrue),
            Argument::new(["--color"]).action(ActionKind::StoreFalse),
            Argument::new(["-v"]).action(ActionKind::Count),
            Argument::new(["--mode"])
                .action(ActionKind::StoreConst)
                .constant("fast"),
        ],
    );

    let namespace = parser
        .parse_args(["-q", "--color", "-vvv", "-v", "--mode"])
        .unwrap();

    assert_eq!(namespace.get("q"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("color"), Some(&Value::Bool(false)));
    assert_eq!(namespace.get("v"), Some(&Value::Int(4)));
    assert_eq!(namespace.get("mode"), Some(&Value::from("fast")));
}

#[test]
fn test_boolean_optional() {
    let parser = build(
        prog(),
        vec![Argument::new(["--foo"]).action(ActionKind::BooleanOptional)],
    );

    let get = |args: &[&str]| parser.parse_args(args).unwrap().get("foo").cloned();

    assert_eq!(get(&[]), Some(Value::None));
    assert_eq!(get(&["--foo"]), Some(Value::Bool(true)));
    assert_eq!(get(&["--no-foo"]), Some(Value::Bool(false)));
    assert_eq!(get(&["--foo", "--no-foo"]), Some(Value::Bool(false)));
}

#[test]
fn test_boolean_optional_overrides_default() {
    let on = build(
        prog(),
        vec![
            Argument::new(["--foo"])
                .action(ActionKind::BooleanOptional)
                .default(true),
        ],
    );
    let off = build(
        prog(),
        vec![
            Argument::new(["--foo"])
                .action(ActionKind::BooleanOptional)
                .default(false),
        ],
    );

    let get = |parser: &ArgumentParser, args: &[&str]| {
        parser.parse_args(args).unwrap().get("foo").cloned()
    };

    assert_eq!(get(&on, &[]), Some(Value::Bool(true)));
    assert_eq!(get(&on, &["--no-foo"]), Some(Value::Bool(false)));
    assert_eq!(get(&on, &["--no-f"]), Some(Value::Bool(false)));
    assert_eq!(get(&off, &[]), Some(Value::Bool(false)));
    assert_eq!(get(&off, &["--foo"]), Some(Value::Bool(true)));
}

#[test]
fn test_append_and_extend() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["-a"]).action(ActionKind::Append),
            Argument::new(["-e"])
                .action(ActionKind::Extend)
                .nargs(NArgs::OneOrMore),
            Argument::new(["-c"])
                .action(ActionKind::AppendConst)
                .constant(7)
                .dest("consts"),
            Argument::new(["-k"])
                .action(ActionKind::AppendConst)
                .constant(8)
                .dest("consts"),
        ],
    );

    let namespace = parser
        .parse_args(["-a", "x", "-e", "1", "2", "-a", "y", "-e", "3", "-c", "-k"])
        .unwrap();

    assert_eq!(namespace.get("a"), Some(&strings(&["x", "y"])));
    assert_eq!(namespace.get("e"), Some(&strings(&["1", "2", "3"])));
    assert_eq!(
        namespace.get("consts"),
        Some(&Value::list([Value::Int(7), Value::Int(8)]))
    );
}

#[test]
fn test_append_does_not_mutate_defaults() {
    let parser = build(
        prog(),
        vec![Argument::new(["--tag"])
            .action(ActionKind::Append)
            .default(vec!["base"])],
    );

    let first = parser.parse_args(["--tag", "one"]).unwrap();
    let second = parser.parse_args(["--tag", "two"]).unwrap();

    assert_eq!(first.get("tag"), Some(&strings(&["base", "one"])));
    assert_eq!(second.get("tag"), Some(&strings(&["base", "two"])));
    assert_eq!(
        parser.option("--tag").and_then(|action| action.default()),
        Some(&strings(&["base"]))
    );
}

#[test]
fn test_append_snapshot_survives_later_parse() {
    let parser = build(
        prog(),
        vec![Argument::new(["--tag"]).action(ActionKind::Append)],
    );

    let (namespace, _) = parser.parse_known_args(["--tag", "a"]).unwrap();
    let snapshot = namespace.clone();

    let (namespace, _) = parser
        .parse_known_args_into(["--tag", "b"], namespace)
        .unwrap();

    assert_eq!(snapshot.get("tag"), Some(&strings(&["a"])));
    assert_eq!(namespace.get("tag"), Some(&strings(&["a", "b"])));
}

#[test]
fn test_nargs_shapes() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--one"]).nargs(NArgs::Exact(1)),
            Argument::new(["--pair"]).nargs(NArgs::Exact(2)),
            Argument::new(["--maybe"])
                .nargs(NArgs::Optional)
                .constant("C")
                .default("D"),
            Argument::new(["--many"]).nargs(NArgs::ZeroOrMore),
            Argument::new(["single"]),
            Argument::new(["rest"]).nargs(NArgs::ZeroOrMore),
        ],
    );

    let namespace = parser
        .parse_args(["s", "r1", "r2", "--one", "x", "--pair", "a", "b", "--maybe", "--many"])
        .unwrap();

    assert_eq!(namespace.get("one"), Some(&strings(&["x"])));
    assert_eq!(namespace.get("pair"), Some(&strings(&["a", "b"])));
    assert_eq!(namespace.get("maybe"), Some(&Value::from("C")));
    assert_eq!(namespace.get("many"), Some(&strings(&[])));
    assert_eq!(namespace.get("single"), Some(&Value::from("s")));
    assert_eq!(namespace.get("rest"), Some(&strings(&["r1", "r2"])));

    let namespace = parser.parse_args(["s", "--maybe", "v"]).unwrap();
    assert_eq!(namespace.get("maybe"), Some(&Value::from("v")));
    assert_eq!(namespace.get("rest"), Some(&strings(&[])));

    let namespace = parser.parse_args(["s"]).unwrap();
    assert_eq!(namespace.get("maybe"), Some(&Value::from("D")));
    assert_eq!(namespace.get("one"), Some(&Value::None));
}

#[test]
fn test_optional_positional_default() {
    let parser = build(
        prog(),
        vec![Argument::new(["name"])
            .nargs(NArgs::Optional)
            .default("world")],
    );

    assert_eq!(
        parser.parse_args::<[&str; 0]>([]).unwrap().get("name"),
        Some(&Value::from("world"))
    );
    assert_eq!(
        parser.parse_args(["you"]).unwrap().get("name"),
        Some(&Value::from("you"))
    );
}

#[test]
fn test_arity_errors() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--foo"]),
            Argument::new(["--pair"]).nargs(NArgs::Exact(2)),
            Argument::new(["--some"]).nargs(NArgs::OneOrMore),
        ],
    );

    assert_eq!(
        error_message(&parser, &["--foo"]),
        "argument --foo: expected one argument"
    );
    assert_eq!(
        error_message(&parser, &["--pair", "a"]),
        "argument --pair: expected 2 arguments"
    );
    assert_eq!(
        error_message(&parser, &["--some", "--foo", "x"]),
        "argument --some: expected at least one argument"
    );
}

#[test]
fn test_type_conversion() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["size"]).converter(Converter::int()),
            Argument::new(["--ratio"]).converter(Converter::float()),
            Argument::new(["--retries"])
                .converter(Converter::int())
                .default("5"),
        ],
    );

    let namespace = parser.parse_args(["12", "--ratio", "0.5"]).unwrap();
    assert_eq!(namespace.get("size"), Some(&Value::Int(12)));
    assert_eq!(namespace.get("ratio"), Some(&Value::Float(0.5)));
    assert_eq!(namespace.get("retries"), Some(&Value::Int(5)));

    assert_eq!(
        error_message(&parser, &["twelve"]),
        "argument size: invalid int value: 'twelve'"
    );
    assert_eq!(
        error_message(&parser, &["1", "--ratio", "half"]),
        "argument --ratio: invalid float value: 'half'"
    );
}

#[test]
fn test_custom_converter_message() {
    let even = Converter::new("even", |token| {
        let number: i64 = token
            .parse()
            .map_err(|_| parley::ArgumentTypeError::invalid())?;
        match number % 2 {
            0 => Ok(Value::Int(number)),
            _ => Err(parley::ArgumentTypeError::new(format!("{number} is odd"))),
        }
    });

    let parser = build(prog(), vec![Argument::new(["n"]).converter(even)]);

    assert_eq!(parser.parse_args(["4"]).unwrap().get("n"), Some(&Value::Int(4)));
    assert_eq!(error_message(&parser, &["3"]), "argument n: 3 is odd");
    assert_eq!(
        error_message(&parser, &["x"]),
        "argument n: invalid even value: 'x'"
    );
}

#[test]
fn test_choices() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--color"]).choices(["red", "green"]),
            Argument::new(["--level"])
                .converter(Converter::int())
                .choices([1, 2]),
        ],
    );

    let namespace = parser.parse_args(["--color", "red", "--level", "2"]).unwrap();
    assert_eq!(namespace.get("color"), Some(&Value::from("red")));
    assert_eq!(namespace.get("level"), Some(&Value::Int(2)));

    assert_eq!(
        error_message(&parser, &["--color", "blue"]),
        "argument --color: invalid choice: 'blue' (choose from 'red', 'green')"
    );
    assert_eq!(
        error_message(&parser, &["--level", "3"]),
        "argument --level: invalid choice: 3 (choose from 1, 2)"
    );
}

#[test]
fn test_mutually_exclusive() {
    let mut parser = build(prog(), Vec::new());
    let mut group = parser.add_mutually_exclusive_group(true);
    group
        .add_argument(Argument::new(["--foo"]).action(ActionKind::StoreTrue))
        .unwrap();
    group
        .add_argument(Argument::new(["--bar"]).action(ActionKind::StoreFalse))
        .unwrap();

    let namespace = parser.parse_args(["--bar"]).unwrap();
    assert_eq!(namespace.get("foo"), Some(&Value::Bool(false)));
    assert_eq!(namespace.get("bar"), Some(&Value::Bool(false)));

    assert_eq!(
        error_message(&parser, &["--foo", "--bar"]),
        "argument --bar: not allowed with argument --foo"
    );
    assert_eq!(
        error_message(&parser, &[]),
        "one of the arguments --foo --bar is required"
    );
}

#[test]
fn test_long_option_abbreviation() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--foobar"]),
            Argument::new(["--foonly"]),
            Argument::new(["--quiet"]).action(ActionKind::StoreTrue),
        ],
    );

    let namespace = parser.parse_args(["--foob", "1", "--q"]).unwrap();
    assert_eq!(namespace.get("foobar"), Some(&Value::from("1")));
    assert_eq!(namespace.get("quiet"), Some(&Value::Bool(true)));

    let namespace = parser.parse_args(["--foon=2"]).unwrap();
    assert_eq!(namespace.get("foonly"), Some(&Value::from("2")));

    assert_eq!(
        error_message(&parser, &["--foo", "1"]),
        "ambiguous option: --foo could match --foobar, --foonly"
    );

    let strict = build(
        prog().allow_abbrev(false),
        vec![Argument::new(["--foobar"])],
    );
    assert_eq!(
        error_message(&strict, &["--foob", "1"]),
        "unrecognized arguments: --foob 1"
    );
}

#[test]
fn test_short_clusters_and_attached_values() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["-x"]).action(ActionKind::StoreTrue),
            Argument::new(["-y"]).action(ActionKind::StoreTrue),
            Argument::new(["-z"]),
        ],
    );

    let namespace = parser.parse_args(["-xyzval"]).unwrap();
    assert_eq!(namespace.get("x"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("y"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("z"), Some(&Value::from("val")));

    let namespace = parser.parse_args(["-zfoo"]).unwrap();
    assert_eq!(namespace.get("z"), Some(&Value::from("foo")));
    assert_eq!(namespace.get("x"), Some(&Value::Bool(false)));

    let namespace = parser.parse_args(["-z=eq"]).unwrap();
    assert_eq!(namespace.get("z"), Some(&Value::from("eq")));
}

#[test]
fn test_ignored_explicit_argument() {
    let parser = build(
        prog(),
        vec![Argument::new(["--flag"]).action(ActionKind::StoreTrue)],
    );

    assert_eq!(
        error_message(&parser, &["--flag=yes"]),
        "argument --flag: ignored explicit argument 'yes'"
    );
}

#[test]
fn test_negative_numbers() {
    let parser = build(
        prog(),
        vec![Argument::new(["-f"]), Argument::new(["x"])],
    );

    let namespace = parser.parse_args(["-f", "-1", "-2.5"]).unwrap();
    assert_eq!(namespace.get("f"), Some(&Value::from("-1")));
    assert_eq!(namespace.get("x"), Some(&Value::from("-2.5")));

    let numeric = build(
        prog(),
        vec![
            Argument::new(["-1"]).dest("one").action(ActionKind::StoreTrue),
            Argument::new(["x"]).nargs(NArgs::Optional),
        ],
    );
    let namespace = numeric.parse_args(["-1"]).unwrap();
    assert_eq!(namespace.get("one"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("x"), Some(&Value::None));
}

#[test]
fn test_double_dash_terminator() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["-f"]).action(ActionKind::StoreTrue),
            Argument::new(["args"]).nargs(NArgs::ZeroOrMore),
        ],
    );

    let namespace = parser.parse_args(["a", "--", "-f", "b"]).unwrap();
    assert_eq!(namespace.get("f"), Some(&Value::Bool(false)));
    assert_eq!(namespace.get("args"), Some(&strings(&["a", "-f", "b"])));
}

#[test]
fn test_remainder() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--verbose"]).action(ActionKind::StoreTrue),
            Argument::new(["command"]),
            Argument::new(["args"]).nargs(NArgs::Remainder),
        ],
    );

    let namespace = parser
        .parse_args(["--verbose", "ls", "-la", "--verbose"])
        .unwrap();
    assert_eq!(namespace.get("verbose"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("command"), Some(&Value::from("ls")));
    assert_eq!(namespace.get("args"), Some(&strings(&["-la", "--verbose"])));
}

#[test]
fn test_known_args_and_unrecognized() {
    let parser = build(prog(), vec![Argument::new(["x"])]);

    let (namespace, extras) = parser
        .parse_known_args(["--unknown", "a", "b"])
        .unwrap();
    assert_eq!(namespace.get("x"), Some(&Value::from("a")));
    assert_eq!(extras, ["--unknown", "b"]);

    assert_eq!(
        error_message(&parser, &["a", "b"]),
        "unrecognized arguments: b"
    );
}

#[test]
fn test_parser_level_defaults() {
    let mut parser = build(
        prog().argument_default("fallback"),
        vec![Argument::new(["--foo"])],
    );
    parser.set_defaults("command", "run");
    parser.set_defaults("foo", "preset");

    let namespace = parser.parse_args::<[&str; 0]>([]).unwrap();
    assert_eq!(namespace.get("foo"), Some(&Value::from("preset")));
    assert_eq!(namespace.get("command"), Some(&Value::from("run")));
    assert_eq!(parser.get_default("command"), Some(&Value::from("run")));

    parser.add_argument(Argument::new(["--bar"])).unwrap();
    let namespace = parser.parse_args::<[&str; 0]>([]).unwrap();
    assert_eq!(namespace.get("bar"), Some(&Value::from("fallback")));
}

#[test]
fn test_suppressed_default_keeps_dest_out() {
    let parser = build(prog(), vec![Argument::new(["--foo"]).suppress_default()]);

    let namespace = parser.parse_args::<[&str; 0]>([]).unwrap();
    assert!(!namespace.contains("foo"));

    let namespace = parser.parse_args(["--foo", "x"]).unwrap();
    assert_eq!(namespace.get("foo"), Some(&Value::from("x")));
}

#[test]
fn test_deprecation_warnings() {
    let parser = build(
        prog(),
        vec![
            Argument::new(["--old"]).deprecated(true),
            Argument::new(["legacy"])
                .nargs(NArgs::Optional)
                .deprecated(true),
        ],
    );

    let namespace = parser
        .parse_args(["--old", "1", "--old", "2", "value"])
        .unwrap();
    assert_eq!(
        namespace.warnings(),
        ["option '--old' is deprecated", "argument 'legacy' is deprecated"]
    );

    let namespace = parser.parse_args::<[&str; 0]>([]).unwrap();
    assert!(namespace.warnings().is_empty());
}

#[test]
fn test_help_and_version_exit() {
    let parser = build(
        prog().version("{prog} 1.2"),
        vec![Argument::new(["--version"]).action(ActionKind::Version)],
    );

    let error = parser.parse_args(["--help", "--bogus"]).unwrap_err();
    assert_eq!(error.status(), 0);
    assert_eq!(parser.format_error(&error), parser.format_help());

    let error = parser.parse_args(["--version"]).unwrap_err();
    assert_eq!(parser.format_error(&error), "PROG 1.2\n");
}

#[test]
fn test_alternate_prefix_chars() {
    let parser = build(
        prog().prefix_chars("+"),
        vec![
            Argument::new(["+f"]).action(ActionKind::StoreTrue),
            Argument::new(["++bar"]),
        ],
    );

    let namespace = parser.parse_args(["+f", "++bar", "x"]).unwrap();
    assert_eq!(namespace.get("f"), Some(&Value::Bool(true)));
    assert_eq!(namespace.get("bar"), Some(&Value::from("x")));

    let error = parser.parse_args(["+h"]).unwrap_err();
    assert_eq!(error.status(), 0);
}
