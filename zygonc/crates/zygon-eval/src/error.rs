use zygon_util::Span;

/// Every way evaluation can fail. Most variants correspond 1:1 to a `panic`
/// in the reference implementation; here they are ordinary error values
/// that propagate with `?` up to `Program.crash`'s sole process-exit point.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("{span}: unknown identifier `{name}`")]
    UnknownIdentifier { name: String, span: Span },

    #[error("{span}: `not` requires a boolean operand")]
    NotRequiresBoolean { span: Span },

    #[error("{span}: `-` requires a number operand")]
    NegateRequiresNumber { span: Span },

    #[error("{span}: `and`/`or` require boolean operands on both sides")]
    LogicalRequiresBoolean { span: Span },

    #[error("{span}: arithmetic requires number operands")]
    ArithmeticRequiresNumber { span: Span },

    #[error("{span}: comparison requires number operands")]
    ComparisonRequiresNumber { span: Span },

    #[error("{span}: cannot access `.{attribute}` on a non-table value")]
    AccessOnNonTable { attribute: String, span: Span },

    #[error("{span}: table has no entry `{key}`")]
    NoSuchEntry { key: String, span: Span },

    #[error("{span}: `{name}` has no default value and was not supplied")]
    MissingArgument { name: String, span: Span },

    #[error("{span}: cannot call a non-function value")]
    NotCallable { span: Span },

    #[error("{span}: cannot spread a non-table value with `...`")]
    SpreadRequiresTable { span: Span },

    #[error("{span}: cannot spread an unnamed entry into a parameter list")]
    SpreadEntryUnnamed { span: Span },

    #[error("{span}: spread entry `{name}` is not one of this function's parameters")]
    SpreadEntryUnknownName { name: String, span: Span },

    #[error("{span}: bare `...` is only valid inside a `case` pattern")]
    BareRestOutsideCase { span: Span },

    #[error("{span}: `pub` requires a name, not an anonymous function")]
    PubRequiresName { span: Span },

    #[error("{span}: `{name}` is already bound in this scope")]
    AlreadyBound { name: String, span: Span },

    #[error("{span}: {message}")]
    Builtin { message: String, span: Span },

    #[error("{span}: a subjectless `case` arm's pattern must evaluate to a boolean")]
    CasePatternNotBoolean { span: Span },

    #[error("{span}: no `case` arm matched and there is no `default`")]
    NonExhaustiveCase { span: Span },

    #[error("{span}: `...name` in a pattern requires a bare identifier")]
    RestPatternRequiresIdentifier { span: Span },

    #[error("{span}: `using` is only valid at the top level of a program or module")]
    UsingOutsideTopLevel { span: Span },

    #[error("{span}: `pub` is only valid at the top level of a program or module")]
    PubOutsideTopLevel { span: Span },

    #[error("module `{name}` not found in the builtin registry, `{project_root}`, or `{lib_root}`")]
    ModuleNotFound {
        name: String,
        project_root: String,
        lib_root: String,
        span: Span,
    },

    #[error("module `{path}` is already being loaded (cycle in `using`)")]
    ModuleCycle { path: String, span: Span },

    #[error("module `{path}` has no public symbol `{symbol}`")]
    NoSuchPublicSymbol {
        path: String,
        symbol: String,
        span: Span,
    },

    #[error("{0}")]
    Io(String),

    #[error(transparent)]
    Lex(#[from] zygon_lex::LexError),

    #[error(transparent)]
    Parse(#[from] zygon_par::ParseError),
}

pub type EvalResult<T> = Result<T, EvalError>;
