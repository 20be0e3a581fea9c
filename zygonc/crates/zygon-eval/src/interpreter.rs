//! The `Eval`/`Exec` dispatch.
//!
//! Grounded on `evaluator.go`'s `Eval`/`Exec`. The single most consequential
//! fact learned from that source: `ast.Block` evaluates its body directly
//! against the environment it is handed — it never pushes a child frame.
//! Only a function call's argument binding and a matched `case` arm's
//! pattern binding ever call [`crate::env::Environment::new_child`]. That
//! means a nested `name: value` inside an assignment's block, or inside a
//! `case` arm's body, binds into whichever frame the block was given, not
//! into one of its own.
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::instrument;
use zygon_lex::Lexer;
use zygon_par::{Block, CallArgument, InfixOp, Node, NodeKind, PrefixOp, UsingModule};
use zygon_util::{Span, Symbol};

use crate::builtins::BUILTIN_MODULES;
use crate::env::{EnvId, Environment, BLOCK_VALUE};
use crate::error::{EvalError, EvalResult};
use crate::value::{BuiltinData, Entries, FunctionData, Value};

pub struct Evaluator {
    pub env: Environment,
    pub(crate) project_root: PathBuf,
    pub(crate) lib_root: PathBuf,
    pub(crate) load_stack: Vec<PathBuf>,
}

impl Evaluator {
    pub fn new(project_root: PathBuf, lib_root: PathBuf) -> Self {
        Evaluator {
            env: Environment::new(),
            project_root,
            lib_root,
            load_stack: Vec::new(),
        }
    }

    /// Reads and runs a `.zygon` entry file: `projectRoot` becomes the
    /// file's own directory, `libRoot` is `./lib` relative to the current
    /// working directory, matching the CLI's documented resolution order.
    pub fn run_file(path: &Path) -> EvalResult<Value> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| EvalError::Io(format!("{}: {e}", path.display())))?;
        let project_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let lib_root = PathBuf::from("lib");
        let mut evaluator = Evaluator::new(project_root, lib_root);
        let root = evaluator.env.root();
        evaluator.exec_source(&source, root)
    }

    /// Runs `source` as a standalone top-level program rooted at
    /// `project_root`/`lib_root`, with no backing entry file. Exposed for
    /// embedding and for integration tests that need `using` to resolve
    /// on-disk modules without going through `run_file`.
    pub fn run_source(project_root: PathBuf, lib_root: PathBuf, source: &str) -> EvalResult<Value> {
        let mut evaluator = Evaluator::new(project_root, lib_root);
        let root = evaluator.env.root();
        evaluator.exec_source(source, root)
    }

    /// Tokenizes, parses, and evaluates `source` as a program's top level in
    /// `env`. A trailing newline is appended here (and in the module
    /// loader) rather than inside the lexer, so the indentation stack
    /// always flushes its final `Dedent`s even when the source itself ends
    /// mid-line.
    pub(crate) fn exec_source(&mut self, source: &str, env: EnvId) -> EvalResult<Value> {
        let padded = format!("{source}\n");
        let tokens = Lexer::new(&padded).tokenize()?;
        let body = zygon_par::parse(tokens)?;
        self.eval_body(&body, env, true)
    }

    /// A function body, a `case` arm's body, or an assignment's
    /// right-hand-side block: `using`/`pub` are illegal here, matching the
    /// reference implementation's panic on either appearing inside a
    /// non-Program `ast.Block`.
    pub(crate) fn eval_block(&mut self, body: &Block, env: EnvId) -> EvalResult<Value> {
        self.eval_body(body, env, false)
    }

    fn eval_body(&mut self, body: &Block, env: EnvId, top_level: bool) -> EvalResult<Value> {
        let mut result = Value::Nil;
        for node in body {
            match &node.kind {
                NodeKind::AssignmentStatement { .. } | NodeKind::FunctionDeclaration { .. } => {
                    self.eval(node, env)?;
                }
                NodeKind::UsingStatement(_) => {
                    if !top_level {
                        return Err(EvalError::UsingOutsideTopLevel { span: node.span });
                    }
                    self.eval(node, env)?;
                }
                NodeKind::PubStatement(_) => {
                    if !top_level {
                        return Err(EvalError::PubOutsideTopLevel { span: node.span });
                    }
                    self.eval(node, env)?;
                }
                _ => {
                    result = self.eval(node, env)?;
                    self.env.bind(env, Symbol::intern(BLOCK_VALUE), result.clone());
                }
            }
        }
        Ok(result)
    }

    #[instrument(level = "trace", skip(self, env))]
    pub(crate) fn eval(&mut self, node: &Node, env: EnvId) -> EvalResult<Value> {
        let span = node.span;
        match &node.kind {
            NodeKind::Identifier(name) => self
                .env
                .get(env, *name)
                .ok_or(EvalError::UnknownIdentifier {
                    name: name.to_string(),
                    span,
                }),
            NodeKind::NumberLiteral(n) => Ok(Value::Number(*n)),
            NodeKind::BooleanLiteral(b) => Ok(Value::Boolean(*b)),
            NodeKind::TextPart(s) => Ok(Value::Text(s.clone())),
            NodeKind::TextLiteral(parts) => self.eval_text_literal(parts, env),
            NodeKind::Grouped(inner) => self.eval(inner, env),

            NodeKind::PubStatement(inner) => self.eval_pub_statement(inner, env, span),
            NodeKind::AssignmentStatement { name, value } => {
                self.eval_assignment(*name, value, env, span)
            }
            NodeKind::UsingStatement(modules) => {
                for module in modules {
                    self.eval_using_module(module, env, span)?;
                }
                Ok(Value::Nil)
            }

            NodeKind::Prefix { op, right } => self.eval_prefix(*op, right, env, span),
            NodeKind::Infix { left, op, right } => self.eval_infix(left, *op, right, env, span),

            NodeKind::FunctionDeclaration {
                name,
                params,
                rest,
                body,
            } => self.eval_function_declaration(*name, params, *rest, body, env),
            NodeKind::FunctionCall { callee, arguments } => {
                self.eval_call(callee, arguments, env, span)
            }

            NodeKind::TableLiteral(entries) => self.eval_table_literal(entries, env),
            NodeKind::Access { subject, attribute } => {
                self.eval_access(subject, attribute, env, span)
            }

            NodeKind::CaseExpression {
                subject,
                cases,
                default,
            } => self.eval_case(subject.as_deref(), cases, default.as_ref(), env, span),

            NodeKind::RestOperator(_) => Err(EvalError::BareRestOutsideCase { span }),
        }
    }

    fn eval_text_literal(&mut self, parts: &[Node], env: EnvId) -> EvalResult<Value> {
        let mut out = String::new();
        for part in parts {
            match &part.kind {
                NodeKind::TextPart(text) => out.push_str(text),
                _ => out.push_str(&self.eval(part, env)?.inspect()),
            }
        }
        Ok(Value::Text(out))
    }

    fn eval_pub_statement(&mut self, inner: &Node, env: EnvId, span: Span) -> EvalResult<Value> {
        let name = match &inner.kind {
            NodeKind::AssignmentStatement { name, .. } => Some(*name),
            NodeKind::FunctionDeclaration { name, .. } => *name,
            _ => None,
        };
        let Some(name) = name else {
            return Err(EvalError::PubRequiresName { span });
        };
        self.eval(inner, env)?;
        let value = self
            .env
            .get_local(env, name)
            .expect("pub's wrapped node just bound this name in this frame");
        self.env
            .bind(env, Symbol::intern(&format!("pub {name}")), value);
        Ok(Value::Nil)
    }

    fn eval_assignment(
        &mut self,
        name: Symbol,
        value: &Block,
        env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        if self.env.get_local(env, name).is_some() {
            return Err(EvalError::AlreadyBound {
                name: name.to_string(),
                span,
            });
        }
        let result = self.eval_block(value, env)?;
        self.env.bind(env, name, result);
        Ok(Value::Nil)
    }

    fn eval_prefix(&mut self, op: PrefixOp, right: &Node, env: EnvId, span: Span) -> EvalResult<Value> {
        let value = self.eval(right, env)?;
        match (op, value) {
            (PrefixOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (PrefixOp::Not, _) => Err(EvalError::NotRequiresBoolean { span }),
            (PrefixOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
            (PrefixOp::Negate, _) => Err(EvalError::NegateRequiresNumber { span }),
        }
    }

    fn eval_infix(
        &mut self,
        left: &Node,
        op: InfixOp,
        right: &Node,
        env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        match op {
            InfixOp::Is => Ok(Value::Boolean(self.eval(left, env)? == self.eval(right, env)?)),
            InfixOp::IsNot => Ok(Value::Boolean(self.eval(left, env)? != self.eval(right, env)?)),
            InfixOp::And => {
                let lb = self
                    .eval(left, env)?
                    .is_truthy_boolean()
                    .ok_or(EvalError::LogicalRequiresBoolean { span })?;
                if !lb {
                    return Ok(Value::Boolean(false));
                }
                let rb = self
                    .eval(right, env)?
                    .is_truthy_boolean()
                    .ok_or(EvalError::LogicalRequiresBoolean { span })?;
                Ok(Value::Boolean(rb))
            }
            InfixOp::Or => {
                let lb = self
                    .eval(left, env)?
                    .is_truthy_boolean()
                    .ok_or(EvalError::LogicalRequiresBoolean { span })?;
                if lb {
                    return Ok(Value::Boolean(true));
                }
                let rb = self
                    .eval(right, env)?
                    .is_truthy_boolean()
                    .ok_or(EvalError::LogicalRequiresBoolean { span })?;
                Ok(Value::Boolean(rb))
            }
            InfixOp::LessThan | InfixOp::GreaterThan => {
                match (self.eval(left, env)?, self.eval(right, env)?) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(if op == InfixOp::LessThan {
                        a < b
                    } else {
                        a > b
                    })),
                    _ => Err(EvalError::ComparisonRequiresNumber { span }),
                }
            }
            InfixOp::Add | InfixOp::Subtract | InfixOp::Multiply | InfixOp::Divide => {
                match (self.eval(left, env)?, self.eval(right, env)?) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
                        InfixOp::Add => a + b,
                        InfixOp::Subtract => a - b,
                        InfixOp::Multiply => a * b,
                        InfixOp::Divide => a / b,
                        _ => unreachable!(),
                    })),
                    _ => Err(EvalError::ArithmeticRequiresNumber { span }),
                }
            }
        }
    }

    fn eval_function_declaration(
        &mut self,
        name: Option<Symbol>,
        params: &[zygon_par::Param],
        rest: Option<Symbol>,
        body: &Block,
        env: EnvId,
    ) -> EvalResult<Value> {
        let mut bound_params = Vec::with_capacity(params.len());
        for param in params {
            let default = match &param.default {
                Some(expr) => Some(self.eval(expr, env)?),
                None => None,
            };
            bound_params.push((param.name, default));
        }
        let function = Value::Function(Rc::new(FunctionData {
            name,
            params: bound_params,
            rest,
            body: body.clone(),
            env,
        }));
        if let Some(name) = name {
            self.env.bind(env, name, function.clone());
        }
        Ok(function)
    }

    fn eval_table_literal(
        &mut self,
        entries: &[zygon_par::TableEntryNode],
        env: EnvId,
    ) -> EvalResult<Value> {
        let mut out = Entries::new();
        let mut index: i64 = 0;
        for entry in entries {
            match entry.key {
                Some(name) => {
                    let value = self.eval(&entry.value, env)?;
                    out.insert(Value::TableKey(name), value);
                }
                None => match &entry.value.kind {
                    NodeKind::RestOperator(Some(expr)) => {
                        let spread = self.eval(expr, env)?;
                        let table = spread.as_table().ok_or(EvalError::SpreadRequiresTable {
                            span: entry.value.span,
                        })?;
                        let source: Vec<(Value, Value)> =
                            table.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                        for (key, value) in source {
                            match key {
                                Value::Number(_) => {
                                    out.insert(Value::Number(index as f64), value);
                                    index += 1;
                                }
                                other => {
                                    out.insert(other, value);
                                }
                            }
                        }
                    }
                    NodeKind::RestOperator(None) => {
                        return Err(EvalError::BareRestOutsideCase {
                            span: entry.value.span,
                        })
                    }
                    _ => {
                        let value = self.eval(&entry.value, env)?;
                        out.insert(Value::Number(index as f64), value);
                        index += 1;
                    }
                },
            }
        }
        Ok(Value::new_table(out))
    }

    fn eval_access(
        &mut self,
        subject: &Node,
        attribute: &Node,
        env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        let subject_value = self.eval(subject, env)?;
        let key = match &attribute.kind {
            NodeKind::Identifier(name) => Value::TableKey(*name),
            NodeKind::Grouped(inner) => self.eval(inner, env)?,
            _ => self.eval(attribute, env)?,
        };
        let table = subject_value
            .as_table()
            .ok_or_else(|| EvalError::AccessOnNonTable {
                attribute: key.inspect(),
                span,
            })?;
        let found = table.borrow().get(&key).cloned();
        found.ok_or_else(|| EvalError::NoSuchEntry {
            key: key.inspect(),
            span,
        })
    }

    fn eval_call(
        &mut self,
        callee: &Node,
        arguments: &[CallArgument],
        env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        let callee_value = self.eval(callee, env)?;
        match callee_value {
            Value::Function(f) => self.call_function(&f, arguments, env, span),
            Value::BuiltinFunction(b) => self.call_builtin(&b, arguments, env, span),
            _ => Err(EvalError::NotCallable { span }),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<FunctionData>,
        arguments: &[CallArgument],
        caller_env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        let bindings = self.bind_arguments(
            &function.params,
            function.rest,
            arguments,
            caller_env,
            span,
        )?;
        let call_env = self.env.new_child(function.env);
        for (name, value) in bindings {
            self.env.bind(call_env, name, value);
        }
        self.eval_block(&function.body, call_env)
    }

    fn call_builtin(
        &mut self,
        builtin: &Rc<BuiltinData>,
        arguments: &[CallArgument],
        caller_env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        let bindings = self.bind_arguments(
            &builtin.params,
            builtin.rest,
            arguments,
            caller_env,
            span,
        )?;
        (builtin.func)(bindings).map_err(|message| EvalError::Builtin { message, span })
    }

    /// Shared two-phase argument binding for both user functions and
    /// builtins, grounded on `evaluator.go`'s identical logic for
    /// `FunctionCall` and `BuiltinFunction`: a positional walk over
    /// declared parameters (each slot falling back to its default, or
    /// expanding a `...expr` splice restricted to declared parameter
    /// names), followed — only if a rest parameter is declared and more
    /// call arguments remain than declared parameters — by collecting the
    /// remainder into a fresh rest table.
    ///
    /// One quirk is deliberate, not an oversight: a splice argument at
    /// positional slot `i` can bind parameters whose names don't
    /// correspond to slot `i` at all, yet the walk still advances one slot
    /// per argument. A later slot whose argument doesn't exist still falls
    /// through to its own default (or errors) even if the splice already
    /// bound it.
    fn bind_arguments(
        &mut self,
        params: &[(Symbol, Option<Value>)],
        rest: Option<Symbol>,
        arguments: &[CallArgument],
        caller_env: EnvId,
        span: Span,
    ) -> EvalResult<IndexMap<Symbol, Value>> {
        let mut bindings: IndexMap<Symbol, Value> = IndexMap::new();

        for (i, (param_name, default)) in params.iter().enumerate() {
            match arguments.get(i) {
                Some(argument) => match &argument.value.kind {
                    NodeKind::RestOperator(Some(expr)) => {
                        self.expand_splice_into_params(expr, params, caller_env, &mut bindings, span)?;
                    }
                    NodeKind::RestOperator(None) => {
                        return Err(EvalError::BareRestOutsideCase { span: argument.value.span })
                    }
                    _ => {
                        let bind_name = argument.name.unwrap_or(*param_name);
                        let value = self.eval(&argument.value, caller_env)?;
                        bindings.insert(bind_name, value);
                    }
                },
                None => {
                    let value = default.clone().ok_or(EvalError::MissingArgument {
                        name: param_name.to_string(),
                        span,
                    })?;
                    bindings.insert(*param_name, value);
                }
            }
        }

        if let Some(rest_name) = rest {
            if arguments.len() > params.len() {
                let mut rest_entries = Entries::new();
                let mut index: i64 = 0;
                for argument in &arguments[params.len()..] {
                    match &argument.value.kind {
                        NodeKind::RestOperator(Some(expr)) => {
                            self.expand_splice_into_params(expr, params, caller_env, &mut bindings, span)?;
                        }
                        NodeKind::RestOperator(None) => {
                            return Err(EvalError::BareRestOutsideCase { span: argument.value.span })
                        }
                        _ => {
                            let value = self.eval(&argument.value, caller_env)?;
                            match argument.name {
                                Some(name) => {
                                    rest_entries.insert(Value::TableKey(name), value);
                                }
                                None => {
                                    rest_entries.insert(Value::Number(index as f64), value);
                                    index += 1;
                                }
                            }
                        }
                    }
                }
                bindings.insert(rest_name, Value::new_table(rest_entries));
            }
        }

        Ok(bindings)
    }

    fn expand_splice_into_params(
        &mut self,
        expr: &Node,
        params: &[(Symbol, Option<Value>)],
        caller_env: EnvId,
        bindings: &mut IndexMap<Symbol, Value>,
        span: Span,
    ) -> EvalResult<()> {
        let spread = self.eval(expr, caller_env)?;
        let table = spread
            .as_table()
            .ok_or(EvalError::SpreadRequiresTable { span })?;
        let entries: Vec<(Value, Value)> =
            table.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        for (key, value) in entries {
            match key {
                Value::TableKey(name) => {
                    if params.iter().any(|(p, _)| *p == name) {
                        bindings.insert(name, value);
                    } else {
                        return Err(EvalError::SpreadEntryUnknownName {
                            name: name.to_string(),
                            span,
                        });
                    }
                }
                _ => return Err(EvalError::SpreadEntryUnnamed { span }),
            }
        }
        Ok(())
    }

    fn eval_case(
        &mut self,
        subject: Option<&Node>,
        cases: &[zygon_par::CaseArm],
        default: Option<&Block>,
        env: EnvId,
        span: Span,
    ) -> EvalResult<Value> {
        match subject {
            None => {
                for arm in cases {
                    let matched = self
                        .eval(&arm.pattern, env)?
                        .is_truthy_boolean()
                        .ok_or(EvalError::CasePatternNotBoolean { span: arm.pattern.span })?;
                    if matched {
                        return self.eval_block(&arm.body, env);
                    }
                }
            }
            Some(subject_node) => {
                let subject_value = self.eval(subject_node, env)?;
                for arm in cases {
                    if let Some(bindings) = self.try_match_pattern(&arm.pattern, &subject_value, env)? {
                        let case_env = self.env.new_child(env);
                        for (name, value) in bindings {
                            self.env.bind(case_env, name, value);
                        }
                        return self.eval_block(&arm.body, case_env);
                    }
                }
            }
        }
        match default {
            Some(body) => self.eval_block(body, env),
            None => Err(EvalError::NonExhaustiveCase { span }),
        }
    }

    fn eval_using_module(&mut self, module: &UsingModule, env: EnvId, span: Span) -> EvalResult<()> {
        let leaf = *module
            .path
            .last()
            .expect("a parsed `using` path always has at least one segment");

        if module.path.len() == 1 {
            if let Some(table) = BUILTIN_MODULES.get(module.path[0].as_str()) {
                let table = table.clone();
                self.env.bind(env, leaf, table.clone());
                for symbol in &module.symbols {
                    let value = table
                        .as_table()
                        .and_then(|t| t.borrow().get(&Value::TableKey(*symbol)).cloned())
                        .ok_or_else(|| EvalError::NoSuchPublicSymbol {
                            path: module.path[0].to_string(),
                            symbol: symbol.to_string(),
                            span,
                        })?;
                    self.env.bind(env, *symbol, value);
                }
                return Ok(());
            }
        }

        let (pub_table, module_env) = self.load_module(&module.path, span)?;
        self.env.bind(env, leaf, pub_table);
        for symbol in &module.symbols {
            let key = Symbol::intern(&format!("pub {symbol}"));
            let value = self.env.get_local(module_env, key).ok_or_else(|| {
                EvalError::NoSuchPublicSymbol {
                    path: module
                        .path
                        .iter()
                        .map(Symbol::to_string)
                        .collect::<Vec<_>>()
                        .join("."),
                    symbol: symbol.to_string(),
                    span,
                }
            })?;
            self.env.bind(env, *symbol, value);
        }
        Ok(())
    }
}
