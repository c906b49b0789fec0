//! Property tests: generic conversion is idempotent and only ever adds
//! awaits around suspending call targets.

use proptest::prelude::*;
use surfacegen_ast::visit;
use surfacegen_ast::{BinOpKind, Expression, MethodDefinition, Statement};
use surfacegen_transform::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_callee() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("upsert".to_string()),
        Just("query".to_string()),
        Just("search".to_string()),
        Just("scroll".to_string()),
        Just("len".to_string()),
    ]
}

/// Calls on `self`, on an alias, or bare, possibly nested one level.
fn arb_call() -> impl Strategy<Value = Expression> {
    let leaf = (arb_callee(), 0u8..3).prop_map(|(name, receiver)| match receiver {
        0 => Expression::self_attr(name).call(vec![]),
        1 => Expression::name("client").attr(name).call(vec![]),
        _ => Expression::name(name).call(vec![]),
    });
    leaf.prop_recursive(2, 8, 2, |inner| {
        (arb_callee(), prop::collection::vec(inner, 0..2))
            .prop_map(|(name, args)| Expression::self_attr(name).call(args))
    })
}

fn arb_statement() -> impl Strategy<Value = Statement> {
    let simple = prop_oneof![
        arb_call().prop_map(Statement::expr),
        arb_call().prop_map(|c| Statement::assign(Expression::name("result"), c)),
        arb_call().prop_map(|c| Statement::ret(Some(c))),
        arb_call().prop_map(|c| Statement::aug_assign(Expression::name("total"), BinOpKind::Add, c)),
        (arb_call(), arb_call()).prop_map(|(l, r)| Statement::expr(l.binop(BinOpKind::Sub, r))),
        Just(Statement::opaque("del self._cache")),
        Just(Statement::Pass),
    ];
    simple.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            (arb_call(), prop::collection::vec(inner.clone(), 1..3))
                .prop_map(|(test, body)| Statement::if_then(test, body)),
            (arb_call(), prop::collection::vec(inner, 0..3)).prop_map(|(test, mut body)| {
                body.push(Statement::Break);
                Statement::While { test, body }
            }),
        ]
    })
}

fn arb_method() -> impl Strategy<Value = MethodDefinition> {
    prop::collection::vec(arb_statement(), 0..5)
        .prop_map(|body| MethodDefinition::new("upsert").with_body(body))
}

fn policy() -> TransformationPolicy {
    TransformationPolicy::new()
        .with_keep_sync(["search"])
        .with_async_methods(["search", "upsert", "query"])
}

fn count_awaits(method: &MethodDefinition) -> usize {
    let mut count = 0;
    visit::for_each_expression(&method.body, &mut |e| {
        if e.is_await() {
            count += 1;
        }
    });
    count
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Converting a converted method changes nothing.
    #[test]
    fn conversion_is_idempotent(method in arb_method()) {
        let p = policy();
        let rewriter = AsyncRewriter::new(&p);
        let once = rewriter.convert(method).unwrap();
        let twice = rewriter.convert(once.method.clone()).unwrap();
        prop_assert_eq!(&twice.method, &once.method);
        prop_assert_eq!(twice.awaited_calls, 0);
    }

    /// Re-running the call-site rewrite over an already converted body
    /// finds nothing left to await.
    #[test]
    fn converted_body_is_a_rewrite_fixpoint(method in arb_method()) {
        let p = policy();
        let rewriter = AsyncRewriter::new(&p);
        let once = rewriter.convert(method).unwrap();
        let mut blocking = once.method.clone();
        blocking.is_async = false;
        let again = rewriter.convert(blocking).unwrap();
        prop_assert_eq!(&again.method.body, &once.method.body);
        prop_assert_eq!(again.awaited_calls, 0);
        prop_assert!(again.method.is_async);
    }

    /// Every await in the output was counted, and wraps a suspending call.
    #[test]
    fn awaits_wrap_only_suspending_calls(method in arb_method()) {
        let p = policy();
        let out = AsyncRewriter::new(&p).convert(method).unwrap();
        prop_assert!(out.method.is_async);
        prop_assert_eq!(count_awaits(&out.method), out.awaited_calls);

        let mut ok = true;
        visit::for_each_expression(&out.method.body, &mut |e| {
            if let Expression::Await { value } = e {
                ok &= value
                    .call_target_name()
                    .is_some_and(|name| p.is_suspending_target(name));
            }
        });
        prop_assert!(ok);
    }

    /// The generated class always passes verification, so a second run
    /// over the output reproduces it.
    #[test]
    fn generation_reaches_a_fixpoint(method in arb_method()) {
        let class = surfacegen_ast::ClassDefinition::new("Remote").with_method(method);
        let generator = AsyncSurfaceGenerator::new(policy());
        let first = generator.generate(&class).unwrap();
        let second = generator.generate(&first.class).unwrap();
        prop_assert_eq!(second.class, first.class);
    }
}
