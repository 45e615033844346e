//! Visibility decisions for the node a context currently points at.
//!
//! Checks run in a fixed order, the first decisive one wins:
//!
//! 1. deeper than `max_depth`: hidden;
//! 2. property key starting with an excluded prefix: hidden;
//! 3. force-exposed branch: visible;
//! 4. a decisive exposition graph level;
//! 5. the first visibility rule whose groups match;
//! 6. the root node: visible;
//! 7. default visibility of the owning type, else of the call.
//!
//! A `$forceExpose` graph node or a forcing rule also force-exposes the
//! rest of the branch.

use alloc::string::String;

use crate::context::Context;
use crate::registry::VisibilityRule;

/// Decides whether the current node is visible.
pub fn is_visible(ctx: &mut Context<'_>) -> bool {
    let options = ctx.options();

    if options.max_depth.is_some_and(|max| ctx.depth() > max) {
        return false;
    }

    if let Some(key) = ctx.property_key() {
        let owner_prefixes = ctx
            .owner_descriptor()
            .map(|desc| desc.modifiers().exclude_prefixes.as_slice())
            .unwrap_or_default();
        if options
            .exclude_prefixes
            .iter()
            .chain(owner_prefixes)
            .any(|prefix| key.starts_with(prefix.as_str()))
        {
            return false;
        }
    }

    if ctx.is_force_expose() {
        return true;
    }

    if let Some(decision) = ctx.graph().and_then(|graph| graph.decide()) {
        if decision.force {
            ctx.set_force_expose();
        }
        return decision.expose;
    }

    if let Some(descriptor) = ctx.property_descriptor() {
        if let Some(rule) = first_match(&descriptor.visibility_rules, ctx.groups()) {
            if rule.force_expose {
                ctx.set_force_expose();
            }
            return rule.expose;
        }
    }

    if ctx.depth() == 0 {
        return true;
    }

    ctx.type_default_visibility()
        .unwrap_or(options.default_visibility)
}

/// First rule matching the active groups.
#[inline]
pub fn first_match<'r>(rules: &'r [VisibilityRule], groups: &[String]) -> Option<&'r VisibilityRule> {
    rules.iter().find(|rule| rule.matches(groups))
}

// -----------------------------------------------------------------------------
// Tests
