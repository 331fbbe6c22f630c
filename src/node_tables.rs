//! Declarative node-kind classification tables.
//!
//! Each table is an ordered list of [`NodeRule`]s. Order only matters among prefix/suffix
//! rules that could match the same kind for the same language; the first non-ignore
//! candidate wins and any ignore candidate beats it.

use crate::classify::{NodeRule, Scope, UnwrapRule};
use crate::language::Language as L;

const ALL: Scope = Scope::All;

const GO: Scope = Scope::Only(&[L::Go]);
const JS_TS: Scope = Scope::Only(&[L::JavaScript, L::TypeScript, L::Tsx]);
const TS: Scope = Scope::Only(&[L::TypeScript, L::Tsx]);
const TS_ELM: Scope = Scope::Only(&[L::TypeScript, L::Tsx, L::Elm]);
const TS_PHP: Scope = Scope::Only(&[L::TypeScript, L::Tsx, L::Php]);
const PHP: Scope = Scope::Only(&[L::Php]);
const PHP_CSHARP: Scope = Scope::Only(&[L::Php, L::CSharp]);
const PHP_CSHARP_RUST: Scope = Scope::Only(&[L::Php, L::CSharp, L::Rust]);
const PYTHON: Scope = Scope::Only(&[L::Python]);
const RUBY: Scope = Scope::Only(&[L::Ruby]);
const RUBY_ELIXIR: Scope = Scope::Only(&[L::Ruby, L::Elixir]);
const RUST: Scope = Scope::Only(&[L::Rust]);
const JAVA_CSHARP: Scope = Scope::Only(&[L::Java, L::CSharp]);
const PROPERTY_LANGS: Scope = Scope::Only(&[L::Kotlin, L::Scala, L::Php, L::Swift]);
const ELIXIR: Scope = Scope::Only(&[L::Elixir]);
const BASH: Scope = Scope::Only(&[L::Bash]);
const SCALA: Scope = Scope::Only(&[L::Scala]);
const SWIFT: Scope = Scope::Only(&[L::Swift]);
const KOTLIN: Scope = Scope::Only(&[L::Kotlin]);
const CSHARP_SWIFT: Scope = Scope::Only(&[L::CSharp, L::Swift]);
const C_CPP: Scope = Scope::Only(&[L::C, L::Cpp]);
const GO_C_CPP: Scope = Scope::Only(&[L::Go, L::C, L::Cpp]);
const CPP: Scope = Scope::Only(&[L::Cpp]);
const LUA: Scope = Scope::Only(&[L::Lua]);
const CSS: Scope = Scope::Only(&[L::Css]);
const ELM: Scope = Scope::Only(&[L::Elm]);
const DOCKERFILE: Scope = Scope::Only(&[L::Dockerfile]);

/// Value bindings: the signature stops at the assignment boundary.
pub static ASSIGNMENT: &[NodeRule] = &[
    NodeRule::equal("assignment_expression", ALL),
    NodeRule::equal("declaration", ALL),
    NodeRule::equal("variable_declaration", ALL),
    NodeRule::equal("variable_assignment", ALL),
    NodeRule::equal("const_spec", GO),
    NodeRule::equal("var_spec", GO),
    NodeRule::equal("lexical_declaration", JS_TS),
    NodeRule::equal("field_definition", JS_TS),
    NodeRule::equal("interface_declaration", TS_PHP),
    NodeRule::equal("trait_declaration", PHP),
    NodeRule::equal("enum_declaration", PHP_CSHARP),
    NodeRule::equal("global_declaration", PHP),
    NodeRule::equal("static_variable_declaration", PHP),
    NodeRule::equal("type_alias_declaration", TS_ELM),
    NodeRule::equal("value_declaration", ELM),
    NodeRule::equal("assignment_statement", PYTHON),
    NodeRule::equal("class_variable_assignment", RUBY),
    NodeRule::equal("assignment", RUBY),
    NodeRule::equal("let_declaration", RUST),
    NodeRule::equal("const_item", RUST),
    NodeRule::equal("static_declaration", JAVA_CSHARP),
    NodeRule::equal("member_declaration", JAVA_CSHARP),
    NodeRule::equal("field_declaration", JAVA_CSHARP),
    NodeRule::equal("property_declaration", PROPERTY_LANGS),
    NodeRule::equal("unary_operator", ELIXIR),
    NodeRule::equal("declaration_command", BASH),
    NodeRule::equal("type_item", RUST),
    NodeRule::equal("val_definition", SCALA),
    NodeRule::equal("type_definition", SCALA),
    NodeRule::equal("typealias_declaration", SWIFT),
];

pub static DEFINITION: &[NodeRule] = &[
    NodeRule::suffix("_definition", ALL),
    NodeRule::suffix("_declaration", ALL),
    NodeRule::suffix("_declarator", ALL),
    NodeRule::suffix("_spec", ALL),
    NodeRule::suffix("_binding", ALL),
    NodeRule::suffix("_signature", ALL),
    NodeRule::equal("declaration", ALL),
    NodeRule::suffix("_specifier", ALL),
    NodeRule::prefix("interface_", ALL),
    NodeRule::equal("def", RUBY),
    NodeRule::equal("method", RUBY),
    NodeRule::equal("defmodule", ELIXIR),
    NodeRule::equal("defmacro", ELIXIR),
    NodeRule::equal("port", ELM),
    NodeRule::equal("type_annotation", ELM),
    NodeRule::suffix("_def", C_CPP),
    NodeRule::equal("function_statement", LUA),
    NodeRule::equal("rule_set", CSS),
    NodeRule::equal("from_instruction", DOCKERFILE),
    NodeRule::equal("entrypoint_instruction", DOCKERFILE),
    NodeRule::equal("cmd_instruction", DOCKERFILE),
    NodeRule::equal("expose_instruction", DOCKERFILE),
    NodeRule::equal("copy_instruction", DOCKERFILE),
    NodeRule::equal("env_instruction", DOCKERFILE),
    // imports and includes never make it into an outline
    NodeRule::prefix("import_", ALL).ignored(),
    NodeRule::prefix("require_", ALL).ignored(),
    NodeRule::prefix("use_", ALL).ignored(),
    NodeRule::prefix("namespace_use_", ALL).ignored(),
    NodeRule::prefix("using_", ALL).ignored(),
    NodeRule::prefix("include_", ALL).ignored(),
    NodeRule::prefix("package_", ALL).ignored(),
    NodeRule::suffix("_include", C_CPP).ignored(),
    NodeRule::suffix("_item", RUST),
];

/// Containers whose body is walked for nested definitions.
pub static PARENT: &[NodeRule] = &[
    NodeRule::prefix("class_", ALL),
    NodeRule::prefix("module_", ALL),
    NodeRule::prefix("namespace_", ALL),
    NodeRule::equal("object", SCALA),
    NodeRule::equal("object_declaration", KOTLIN),
    NodeRule::equal("protocol", SWIFT),
    NodeRule::prefix("protocol_", ELIXIR),
    NodeRule::equal("extension", SWIFT),
    NodeRule::equal("const_declaration", GO),
    NodeRule::equal("var_declaration", GO),
    NodeRule::equal("template_declaration", CPP),
    NodeRule::equal("module", RUBY),
    NodeRule::equal("class", RUBY),
    NodeRule::equal("singleton_class", RUBY),
    NodeRule::equal("enum_entry", KOTLIN),
    NodeRule::equal("impl_item", RUST),
    NodeRule::equal("trait_item", RUST),
    NodeRule::equal("trait_definition", SCALA),
    NodeRule::equal("object_definition", SCALA),
    // Lua nests only functions inside functions; locals and calls stay hidden.
    NodeRule::equal("function_statement", LUA).only_children(&["function_statement"]),
];

/// Where a definition's header ends and its body begins.
pub static IMPL_BOUNDARY: &[NodeRule] = &[
    NodeRule::equal("block", Scope::AllExcept(&[L::Ruby, L::Elixir])),
    NodeRule::equal("body", ALL),
    NodeRule::suffix("_body", ALL),
    NodeRule::equal("compound_statement", ALL),
    NodeRule::equal("do_block", RUBY_ELIXIR),
    NodeRule::equal("body_statement", RUBY),
    NodeRule::equal("field_declaration_list", GO_C_CPP),
    NodeRule::equal("property_accessors", CSHARP_SWIFT),
    NodeRule::equal("const_declaration", GO),
    NodeRule::equal("var_declaration", GO),
    NodeRule::equal("method_elem", GO),
    NodeRule::equal("preproc_arg", C_CPP),
    NodeRule::equal("statement_block", JS_TS),
    NodeRule::equal("declaration_list", PHP_CSHARP_RUST),
    NodeRule::suffix("_declaration_list", RUST),
    NodeRule::equal("enum_variant_list", RUST),
    NodeRule::equal("=", SCALA),
];

/// Where a binding's header ends (the `=`-equivalent).
pub static ASSIGNMENT_BOUNDARY: &[NodeRule] = &[
    NodeRule::equal("=", ALL),
    NodeRule::equal(":=", ALL),
    NodeRule::equal("<-", ALL),
    NodeRule::equal("expression", ALL),
    NodeRule::equal("interface_body", TS),
    NodeRule::equal("declaration_list", PHP_CSHARP),
    NodeRule::suffix("_declaration_list", PHP_CSHARP),
    NodeRule::equal("lambda_literal", KOTLIN),
    NodeRule::equal("arguments", ELIXIR),
    NodeRule::equal("eq", ELM),
    NodeRule::equal("statements", SWIFT),
];

pub static IDENTIFIER: &[NodeRule] = &[
    NodeRule::equal("identifier", ALL),
    NodeRule::suffix("_identifier", ALL),
    NodeRule::equal("constant", RUBY),
    NodeRule::equal("name", PHP),
];

pub static PASS_THROUGH_PARENT: &[NodeRule] = &[NodeRule::equal("template_declaration", CPP)];

pub static INCLUDE_AND_CONTINUE: &[NodeRule] = &[NodeRule::equal("template_parameter_list", CPP)];

pub static UNWRAP: &[UnwrapRule] = &[UnwrapRule {
    rule: NodeRule::equal("export_statement", JS_TS),
    fields: &["declaration", "value"],
}];
