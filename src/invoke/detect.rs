//! # Execution-model detection and chain resolution.
//!
//! Whether a handler is suspending is defined purely by its innermost
//! unwrapped leaf; partial-bound arguments and wrapper layers are irrelevant
//! to the classification. The walk is iterative with a bounded depth: chains
//! are acyclic by construction, so exceeding the bound is a programming
//! error surfaced as [`InvokeError::UnresolvableChain`], never a silent
//! "sync" answer.

use std::borrow::Cow;
use std::sync::Arc;

use crate::config::DEFAULT_MAX_UNWRAP_DEPTH;
use crate::error::InvokeError;
use crate::invoke::handler::{
    AsyncHandlerFn, CallArgs, Handler, HandlerRef, SyncHandlerFn,
};
use crate::invoke::kwargs::Kwargs;

/// True if the handler ultimately resolves to a suspending leaf.
///
/// `None` (no handler) classifies as blocking, mirroring the upstream
/// convention that an absent callback is a no-op, not an await point.
pub fn is_async(handler: Option<&HandlerRef>) -> Result<bool, InvokeError> {
    is_async_within(handler, DEFAULT_MAX_UNWRAP_DEPTH)
}

/// [`is_async`] with an explicit unwrap depth limit.
pub fn is_async_within(handler: Option<&HandlerRef>, limit: usize) -> Result<bool, InvokeError> {
    let Some(handler) = handler else {
        return Ok(false);
    };
    let mut current = handler;
    for _ in 0..=limit {
        match current.as_ref() {
            Handler::Async { .. } => return Ok(true),
            Handler::Sync { .. } => return Ok(false),
            Handler::Partial { inner, .. } | Handler::Wrapped { inner, .. } => current = inner,
        }
    }
    Err(InvokeError::UnresolvableChain { limit })
}

/// The leaf function found at the bottom of a chain.
pub(crate) enum LeafFn {
    Sync(Arc<SyncHandlerFn>),
    Async(Arc<AsyncHandlerFn>),
}

/// A chain flattened for calling: the leaf plus fully merged arguments.
pub(crate) struct Resolved {
    pub name: Cow<'static, str>,
    pub leaf: LeafFn,
    pub args: CallArgs,
}

/// Walks the chain to the leaf and merges partial-bound arguments.
///
/// Positionals compose innermost-first, call-site arguments last (the layer
/// closest to the leaf bound its arguments first). Keywords overlay in the
/// same order, so outer layers and finally the call site win collisions.
pub(crate) fn resolve(
    handler: &HandlerRef,
    args: CallArgs,
    limit: usize,
) -> Result<Resolved, InvokeError> {
    let mut layers: Vec<&HandlerRef> = Vec::new();
    let mut current = handler;
    let (name, leaf) = loop {
        if layers.len() > limit {
            return Err(InvokeError::UnresolvableChain { limit });
        }
        match current.as_ref() {
            Handler::Sync { name, call } => break (name.clone(), LeafFn::Sync(Arc::clone(call))),
            Handler::Async { name, call } => break (name.clone(), LeafFn::Async(Arc::clone(call))),
            Handler::Partial { inner, .. } | Handler::Wrapped { inner, .. } => {
                layers.push(current);
                current = inner;
            }
        }
    };

    let mut positional = Vec::new();
    let mut keywords = Kwargs::new();
    for layer in layers.iter().rev() {
        if let Handler::Partial {
            positional: bound,
            keywords: bound_keywords,
            ..
        } = layer.as_ref()
        {
            positional.extend(bound.iter().cloned());
            keywords.merge(bound_keywords.clone());
        }
    }
    positional.extend(args.positional);
    keywords.merge(args.keywords);

    Ok(Resolved {
        name,
        leaf,
        args: CallArgs::new(positional, keywords),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::invoke::kwargs::ArgValue;

    fn sync_leaf() -> HandlerRef {
        Handler::from_sync("leaf", |_args| Ok(json!(null)))
    }

    fn async_leaf() -> HandlerRef {
        Handler::from_async("leaf", |_args| async { Ok(json!(null)) })
    }

    #[test]
    fn test_none_is_not_async() {
        assert!(!is_async(None).expect("classifiable"));
    }

    #[test]
    fn test_plain_leaves() {
        assert!(!is_async(Some(&sync_leaf())).expect("classifiable"));
        assert!(is_async(Some(&async_leaf())).expect("classifiable"));
    }

    #[test]
    fn test_unwraps_nested_mixed_layers() {
        // Three mixed layers around each kind of leaf.
        let wrapped_sync = sync_leaf()
            .partial(Vec::new(), Kwargs::new())
            .wrapped("retry")
            .partial(Vec::new(), Kwargs::new());
        assert!(!is_async(Some(&wrapped_sync)).expect("classifiable"));

        let wrapped_async = async_leaf()
            .wrapped("trace")
            .wrapped("retry")
            .partial(Vec::new(), Kwargs::new());
        assert!(is_async(Some(&wrapped_async)).expect("classifiable"));
    }

    #[test]
    fn test_pathological_chain_is_fatal() {
        let mut handler = sync_leaf();
        for _ in 0..8 {
            handler = handler.wrapped("layer");
        }
        let err = is_async_within(Some(&handler), 4).expect_err("must not classify");
        assert!(matches!(err, InvokeError::UnresolvableChain { limit: 4 }));
    }

    #[test]
    fn test_resolve_merges_partial_arguments() {
        let leaf = sync_leaf();

        let mut inner_bound = Kwargs::new();
        inner_bound.insert("shared", ArgValue::from("inner"));
        inner_bound.insert("inner_only", ArgValue::from("i"));
        let inner = leaf.partial(vec![ArgValue::from("a")], inner_bound);

        let mut outer_bound = Kwargs::new();
        outer_bound.insert("shared", ArgValue::from("outer"));
        let outer = inner.partial(vec![ArgValue::from("b")], outer_bound);

        let mut call_keywords = Kwargs::new();
        call_keywords.insert("call_only", ArgValue::from("c"));
        let call = CallArgs::new(vec![ArgValue::from("z")], call_keywords);

        let resolved =
            resolve(&outer, call, DEFAULT_MAX_UNWRAP_DEPTH).expect("resolvable");

        let positional: Vec<_> = resolved
            .args
            .positional
            .iter()
            .map(|value| value.as_text().unwrap_or("?").to_string())
            .collect();
        assert_eq!(positional, vec!["a", "b", "z"]);

        assert_eq!(
            resolved.args.keywords.get("shared").and_then(ArgValue::as_text),
            Some("outer"),
            "outer layers win keyword collisions"
        );
        assert_eq!(
            resolved.args.keywords.get("inner_only").and_then(ArgValue::as_text),
            Some("i")
        );
        assert_eq!(
            resolved.args.keywords.get("call_only").and_then(ArgValue::as_text),
            Some("c")
        );
        assert_eq!(resolved.name, "leaf");
    }

    #[test]
    fn test_resolve_call_keywords_win() {
        let leaf = sync_leaf();
        let mut bound = Kwargs::new();
        bound.insert("key", ArgValue::from("bound"));
        let partial = leaf.partial(Vec::new(), bound);

        let mut call_keywords = Kwargs::new();
        call_keywords.insert("key", ArgValue::from("call"));
        let resolved = resolve(
            &partial,
            CallArgs::new(Vec::new(), call_keywords),
            DEFAULT_MAX_UNWRAP_DEPTH,
        )
        .expect("resolvable");

        assert_eq!(
            resolved.args.keywords.get("key").and_then(ArgValue::as_text),
            Some("call")
        );
    }
}
