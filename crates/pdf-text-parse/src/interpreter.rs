//! Content stream interpreter.
//!
//! Tokenizes a content stream and dispatches `(operator, operands)` events to
//! a [`ContentHandler`], recursing into Form XObjects through the `Do`
//! operator while tracking nested resource scopes. The interpreter owns no
//! text-placement state of its own — that lives entirely in the handler (the
//! collector).

use pdf_text_core::{ExtractOptions, PdfDictionary, PdfError, PdfObject};

use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::provider::{resolve, ObjectProvider};
use crate::tokenizer::{tokenize, Operand};

/// Drive `content` to completion against `handler`, using `resources` as the
/// innermost resource dictionary and `options` to bound Form XObject
/// recursion.
///
/// Returns `Ok(())` on normal completion, including when the handler aborts
/// the current stream by returning `false` from
/// [`ContentHandler::on_operation`] (non-fatal). Returns `Err` for tokenizer
/// failures (`BackendError::Parse`), exceeded recursion depth
/// (`BackendError::RecursionLimit`), or a content stream longer than
/// `options.max_stream_bytes` (`BackendError::Core(PdfError::ResourceLimitExceeded)`).
pub fn interpret<P: ObjectProvider, H: ContentHandler>(
    provider: &P,
    content: &[u8],
    resources: &PdfDictionary,
    handler: &mut H,
    options: &ExtractOptions,
) -> Result<(), BackendError> {
    run(provider, content, resources, handler, options, 0)
}

/// Recurse into a Form XObject's content stream, one level deeper than the
/// caller. Exposed so a handler reached through `Do` can itself trigger
/// nested interpretation (e.g. re-entering a cached form).
pub fn invoke<P: ObjectProvider, H: ContentHandler>(
    provider: &P,
    content: &[u8],
    resources: &PdfDictionary,
    handler: &mut H,
    options: &ExtractOptions,
    depth: usize,
) -> Result<(), BackendError> {
    run(provider, content, resources, handler, options, depth)
}

fn run<P: ObjectProvider, H: ContentHandler>(
    provider: &P,
    content: &[u8],
    resources: &PdfDictionary,
    handler: &mut H,
    options: &ExtractOptions,
    depth: usize,
) -> Result<(), BackendError> {
    if depth > options.max_recursion_depth {
        return Err(BackendError::RecursionLimit {
            depth,
            limit: options.max_recursion_depth,
        });
    }

    if content.len() > options.max_stream_bytes {
        return Err(BackendError::Core(PdfError::ResourceLimitExceeded {
            limit_name: "max_stream_bytes".to_string(),
            limit_value: options.max_stream_bytes,
            actual_value: content.len(),
        }));
    }

    let operators = tokenize(content)?;
    handler.on_resources_read(resources);

    for op in &operators {
        if !handler.on_operation(&op.name, &op.operands) {
            // Handler aborted this stream; not fatal to sibling streams.
            return Ok(());
        }

        if op.name == "Do" {
            if let Some(Operand::Name(name)) = op.operands.first() {
                do_xobject(provider, resources, name, handler, options, depth)?;
            }
        }
    }

    Ok(())
}

/// Resolve the `Do` operand against the innermost `/XObject` resource
/// mapping. Form XObjects are recursed into; Image XObjects are ignored
/// (they carry no text). A missing or broken reference is logged and
/// skipped rather than treated as fatal.
fn do_xobject<P: ObjectProvider, H: ContentHandler>(
    provider: &P,
    resources: &PdfDictionary,
    name: &str,
    handler: &mut H,
    options: &ExtractOptions,
    depth: usize,
) -> Result<(), BackendError> {
    let Some(xobject_dict) = resources.get_dict("XObject") else {
        return Ok(());
    };
    let Some(entry) = xobject_dict.get(name) else {
        return Ok(());
    };
    let xobject = resolve(provider, entry);

    let Some((stream_dict, _)) = xobject.as_stream() else {
        return Ok(());
    };
    if !is_form_xobject(stream_dict) {
        // Image XObjects (or anything else) carry no text.
        return Ok(());
    }

    let form_bytes = match provider.stream_contents(&xobject) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(()),
    };

    let form_resources = stream_dict
        .get("Resources")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_dict().cloned())
        .unwrap_or_else(|| resources.clone());

    run(
        provider,
        &form_bytes,
        &form_resources,
        handler,
        options,
        depth + 1,
    )?;

    handler.on_xobject_do_end(name);
    Ok(())
}

/// `true` if `dict` names a Form XObject (`/Subtype /Form`).
fn is_form_xobject(dict: &PdfDictionary) -> bool {
    dict.get_name("Subtype") == Some("Form")
}
