use filemap::{map_file, render, CancellationToken, Definition, FileMap};
use pretty_assertions::assert_eq;

fn map(path: &str, src: &str) -> FileMap {
    map_file(&CancellationToken::new(), path, src.as_bytes()).unwrap()
}

fn kinds(defs: &[Definition]) -> Vec<&str> {
    defs.iter().map(|d| d.kind.as_str()).collect()
}

#[test]
fn typescript_exports() {
    let src = "export type T = string;\n\
               export function f(a: number): boolean { return a > 0; }\n\
               export const K = 1;\n\
               export default class C {}\n";
    let fm = map("example.ts", src);

    assert_eq!(
        kinds(&fm.definitions),
        vec![
            "type_alias_declaration",
            "function_declaration",
            "lexical_declaration",
            "class_declaration",
        ]
    );
    let sigs: Vec<&str> = fm.definitions.iter().map(|d| d.signature.trim()).collect();
    assert!(sigs[0].starts_with("export type T"));
    assert!(sigs[1].starts_with("export function f(a: number): boolean"));
    // the binding's signature stops at its `=`
    assert_eq!(sigs[2], "export const K");
    assert!(sigs[3].starts_with("export default class C"));

    let lines: Vec<usize> = fm.definitions.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4]);
    assert_eq!(render(&fm).lines().count(), 4);
}

#[test]
fn typescript_declaration_kinds() {
    let src = r#"
// Type alias example
export type Test = string;
export type MyNumber = number;
export type MyStringArray = string[];

type LocalType = boolean;

export function MyFunction(a: number, b: string): boolean {
    return a == b;
}

function localFunction(a: number, b: string): boolean {
    return true
}

export const SOME_CONSTANT = 123;
const localConstant = "local";
export var someVar = "hello";
let localVar = "mutable";

export class MyClass {
    constructor(private a: number, b: string) {}

    someMethod(a: number, b: string): boolean {
        return a == b;
    }
}

class LocalClass {
    member: number
    method(str: string) {}
}

export interface MyInterface {
    prop: string;
    method(a: number): void;
}

interface LocalInterface {
    prop: string;
    method(a: string): void;
}

export enum MyEnum {
    First = "first",
    Second = "second",
}

enum LocalEnum {
    One = 1,
    Two = 2,
}

export default class DefaultClass {}

export default function defaultFunction() {}
export const anotherFunction = () => {};
"#;
    let fm = map("example.ts", src);
    assert_eq!(
        kinds(&fm.definitions),
        vec![
            "type_alias_declaration",
            "type_alias_declaration",
            "type_alias_declaration",
            "type_alias_declaration",
            "function_declaration",
            "function_declaration",
            "lexical_declaration",
            "lexical_declaration",
            "variable_declaration",
            "lexical_declaration",
            "class_declaration",
            "class_declaration",
            "interface_declaration",
            "interface_declaration",
            "enum_declaration",
            "enum_declaration",
            "class_declaration",
            "function_declaration",
            "lexical_declaration",
        ]
    );
}

#[test]
fn unsupported_extension_renders_sentinel() {
    let fm = map_file(&CancellationToken::new(), "note.xyz", &[0x00, 0xff, 0x13]).unwrap();
    assert!(fm.is_no_map());
    assert_eq!(render(&fm), "[NO MAP]\n");
}

#[test]
fn markdown_headings() {
    let src = "# Title\nbody\n## Sub\n===\nNot a heading because previous is blank\n\nActually H1\n===========\n";
    let fm = map("r.md", src);
    let got: Vec<(&str, &str, usize)> = fm
        .definitions
        .iter()
        .map(|d| (d.kind.as_str(), d.signature.as_str(), d.line))
        .collect();
    assert_eq!(
        got,
        vec![("h1", "Title", 1), ("h2", "Sub", 3), ("h1", "Actually H1", 8)]
    );
}

#[test]
fn repeated_markup_collapses() {
    let list = "<html><body><ul><li>a</li><li>b</li><li>c</li></ul></body></html>\n";
    let out = render(&map("p.html", list));
    assert_eq!(out, "html\n  - head\n  - body\n    - ul\n");

    let fragment = "<ul><li>a</li><li>b</li><li>c</li></ul>";
    assert_eq!(render(&map("p.html", fragment)), out);

    let divs = "<html><body><section><div></div><div></div><div></div></section></body></html>\n";
    let out = render(&map("p.html", divs));
    assert_eq!(out, "html\n  - head\n  - body\n    - section\n      - [3x]div\n");
}

#[test]
fn distinct_attributes_do_not_collapse() {
    let src = "<body><div class=\"a\"></div><div class=\"b\"></div><div id=\"x\"></div></body>\n";
    let out = render(&map("p.html", src));
    assert_eq!(out, "html\n  - head\n  - body\n    - div.a\n    - div.b\n    - div#x\n");
}

#[test]
fn svelte_composition() {
    let src = "<script lang=\"ts\">export const X = 1;</script>\n<main><div></div></main>\n<style>.a{color:red;}</style>\n";
    let out = render(&map("w.svelte", src));
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "<script lang=\"ts\">");
    assert_eq!(lines[1], "  - export const X");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3..8], ["html", "  - head", "  - body", "    - main", "      - div"]);
    assert_eq!(lines[8], "");
    assert_eq!(lines[9], "<style>");
    assert!(lines[10].starts_with("  - .a"));
}

#[cfg(feature = "lang-elm")]
#[test]
fn elm_declarations() {
    let src = "module Main exposing (add)\n\nadd : Int -> Int -> Int\nadd a b =\n    a + b\n";
    let fm = map("src/Main.elm", src);
    let found: Vec<(&str, &str, usize)> = fm
        .definitions
        .iter()
        .map(|d| (d.kind.as_str(), d.signature.trim(), d.line))
        .collect();
    assert!(found.contains(&("type_annotation", "add : Int -> Int -> Int", 3)), "{found:?}");
    assert!(found.contains(&("value_declaration", "add a b", 4)), "{found:?}");
}

#[test]
fn mapping_is_deterministic() {
    let src = "class A:\n    def a(self):\n        pass\n\n    def b(self):\n        pass\n\ndef top():\n    return 1\n";
    let first = render(&map("m.py", src));
    for _ in 0..5 {
        assert_eq!(render(&map("m.py", src)), first);
    }
}

#[test]
fn mapping_depends_on_extension_not_directory() {
    let src = "package main\n\nfunc Run() error {\n\treturn nil\n}\n";
    let a = render(&map("cmd/run.go", src));
    let b = render(&map("elsewhere/deeper/run.go", src));
    assert_eq!(a, b);
    assert_eq!(a, "func Run() error\n");
}

#[test]
fn unsupported_is_exactly_one_line() {
    for path in ["notes.txt", "data.json", "values.yaml", "Cargo.toml", "noext"] {
        let fm = map(path, "whatever");
        assert!(fm.is_no_map(), "{path}");
        assert_eq!(render(&fm), "[NO MAP]\n", "{path}");
    }
}

#[test]
fn nested_lines_follow_depth() {
    let src = "impl Server {\n    pub fn start(&self) {}\n    pub fn stop(&self) {}\n}\n\nmod inner {\n    pub struct Config {\n        pub port: u16,\n    }\n}\n";
    let out = render(&map("server.rs", src));
    for line in out.lines() {
        let indent = line.len() - line.trim_start_matches(' ').len();
        assert_eq!(indent % 2, 0, "{line:?}");
        if indent > 0 {
            assert!(line[indent..].starts_with("- "), "{line:?}");
        }
    }
    assert!(out.starts_with("impl Server\n  - pub fn start(&self)\n  - pub fn stop(&self)\n"));
}

#[test]
fn dockerfile_instructions() {
    let src = "FROM rust:1.80 AS build\nWORKDIR /app\nRUN cargo build \\\n    --release\n# comment\nCMD [\"app\"]\n";
    let fm = map("Dockerfile", src);
    let lines: Vec<usize> = fm.definitions.iter().map(|d| d.line).collect();
    assert!(lines.contains(&1));
    assert!(!lines.contains(&4));
    assert!(!lines.contains(&5));
}

#[test]
fn json_output_shape() {
    let fm = map("a.py", "def a():\n    pass\n");
    let v = serde_json::to_value(&fm).unwrap();
    assert_eq!(v["definitions"][0]["kind"], "function_definition");
    assert_eq!(v["definitions"][0]["line"], 1);
    assert!(v["definitions"][0].get("children").is_none());
}
