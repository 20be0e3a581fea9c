//! Native module registry: `IO`, `Table`, `Text`, `Type`, `Error`, `Program`.
//!
//! Grounded on `builtin/builtin.go` and `builtin/builtinlib.go`: one process-
//! wide table built once behind a [`LazyLock`], exactly as
//! `zygon-util::symbol`'s interner is a process-wide `DashMap` behind a
//! `LazyLock`. `using` looks a module up here before ever touching the
//! filesystem.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::Write;
use std::sync::LazyLock;
use zygon_util::Symbol;

use crate::value::{
    BuiltinData, Entries, Value, TYPE_BOOLEAN, TYPE_ERROR, TYPE_FUNCTION, TYPE_NUMBER, TYPE_TABLE,
    TYPE_TEXT,
};

pub static BUILTIN_MODULES: LazyLock<HashMap<&'static str, Value>> = LazyLock::new(build_registry);

fn build_registry() -> HashMap<&'static str, Value> {
    let mut modules = HashMap::new();

    modules.insert(
        "IO",
        module_table(vec![
            (
                "log",
                builtin("IO", "log", &[("message", None)], None, io_log),
            ),
            ("get", builtin("IO", "get", &[("prompt", None)], None, io_get)),
        ]),
    );

    modules.insert(
        "Table",
        module_table(vec![
            (
                "change",
                builtin(
                    "Table",
                    "change",
                    &[("table", None), ("changes", None)],
                    None,
                    table_change,
                ),
            ),
            (
                "delete",
                builtin(
                    "Table",
                    "delete",
                    &[("table", None), ("index", None)],
                    None,
                    table_delete,
                ),
            ),
        ]),
    );

    modules.insert(
        "Text",
        module_table(vec![(
            "split",
            builtin(
                "Text",
                "split",
                &[("text", None), ("separator", None)],
                None,
                text_split,
            ),
        )]),
    );

    modules.insert(
        "Type",
        module_table(vec![
            ("number", Value::Type(Symbol::intern(TYPE_NUMBER))),
            ("boolean", Value::Type(Symbol::intern(TYPE_BOOLEAN))),
            ("text", Value::Type(Symbol::intern(TYPE_TEXT))),
            ("function", Value::Type(Symbol::intern(TYPE_FUNCTION))),
            ("table", Value::Type(Symbol::intern(TYPE_TABLE))),
            ("error", Value::Type(Symbol::intern(TYPE_ERROR))),
            (
                "type",
                builtin("Type", "type", &[("value", None)], None, type_type),
            ),
        ]),
    );

    modules.insert(
        "Error",
        module_table(vec![(
            "error",
            builtin("Error", "error", &[("message", None)], None, error_error),
        )]),
    );

    modules.insert(
        "Program",
        module_table(vec![(
            "crash",
            builtin(
                "Program",
                "crash",
                &[("reason", None), ("exit_code", Some(Value::Number(1.0)))],
                None,
                program_crash,
            ),
        )]),
    );

    modules
}

fn module_table(entries: Vec<(&'static str, Value)>) -> Value {
    let mut table = Entries::new();
    for (name, value) in entries {
        table.insert(Value::TableKey(Symbol::intern(name)), value);
    }
    Value::new_table(table)
}

fn builtin(
    module: &'static str,
    name: &'static str,
    params: &[(&'static str, Option<Value>)],
    rest: Option<&'static str>,
    func: fn(IndexMap<Symbol, Value>) -> Result<Value, String>,
) -> Value {
    let params = params
        .iter()
        .map(|(name, default)| (Symbol::intern(name), default.clone()))
        .collect();
    Value::BuiltinFunction(std::rc::Rc::new(BuiltinData {
        module,
        name,
        params,
        rest: rest.map(Symbol::intern),
        func,
    }))
}

fn arg(args: &IndexMap<Symbol, Value>, name: &str) -> Result<Value, String> {
    args.get(&Symbol::intern(name))
        .cloned()
        .ok_or_else(|| format!("missing argument `{name}`"))
}

fn expect_text(value: &Value, context: &str) -> Result<String, String> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        other => Err(format!(
            "{context} expects Text, got {}",
            other.type_name()
        )),
    }
}

fn expect_table(value: &Value, context: &str) -> Result<std::rc::Rc<std::cell::RefCell<Entries>>, String> {
    match value.as_table() {
        Some(t) => Ok(t.clone()),
        None => Err(format!(
            "{context} expects Table, got {}",
            value.type_name()
        )),
    }
}

fn io_log(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let message = arg(&args, "message")?;
    println!("{}", message.inspect());
    Ok(Value::Nil)
}

fn io_get(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let prompt = arg(&args, "prompt")?;
    print!("{}", prompt.inspect());
    std::io::stdout()
        .flush()
        .map_err(|e| format!("failed to flush stdout: {e}"))?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::Text(line))
}

fn table_change(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let table = expect_table(&arg(&args, "table")?, "Table.change's `table`")?;
    let changes = expect_table(&arg(&args, "changes")?, "Table.change's `changes`")?;
    let mut out = Entries::new();
    for (k, v) in table.borrow().iter() {
        out.insert(k.deep_clone(), v.deep_clone());
    }
    for (k, v) in changes.borrow().iter() {
        out.insert(k.deep_clone(), v.deep_clone());
    }
    Ok(Value::new_table(out))
}

fn table_delete(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let table = expect_table(&arg(&args, "table")?, "Table.delete's `table`")?;
    let index = arg(&args, "index")?;
    let mut out = Entries::new();
    for (k, v) in table.borrow().iter() {
        out.insert(k.deep_clone(), v.deep_clone());
    }
    out.shift_remove(&index);
    Ok(Value::new_table(crate::value::renumber(&out)))
}

fn text_split(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let text = expect_text(&arg(&args, "text")?, "Text.split's `text`")?;
    let separator = expect_text(&arg(&args, "separator")?, "Text.split's `separator`")?;
    let mut out = Entries::new();
    let parts: Vec<&str> = if separator.is_empty() {
        text.split("").filter(|s| !s.is_empty()).collect()
    } else {
        text.split(separator.as_str()).collect()
    };
    for (i, part) in parts.into_iter().enumerate() {
        out.insert(Value::Number(i as f64), Value::Text(part.to_string()));
    }
    Ok(Value::new_table(out))
}

fn type_type(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let value = arg(&args, "value")?;
    Ok(Value::Type(Symbol::intern(value.type_name())))
}

fn error_error(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let message = expect_text(&arg(&args, "message")?, "Error.error's `message`")?;
    Ok(Value::Error(message))
}

fn program_crash(args: IndexMap<Symbol, Value>) -> Result<Value, String> {
    let reason = arg(&args, "reason")?;
    let exit_code = match arg(&args, "exit_code")? {
        Value::Number(n) => n as i32,
        other => return Err(format!("Program.crash's `exit_code` expects Number, got {}", other.type_name())),
    };
    println!("Crash: {}", reason.inspect());
    std::process::exit(exit_code);
}
