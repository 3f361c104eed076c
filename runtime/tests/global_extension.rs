//! Containers using the global devtools handle.
//!
//! The handle is process-wide, so everything touching it lives in one test.

use bridged_store_core::reducer::Reducer;
use bridged_store_runtime::create_container;
use bridged_store_runtime::devtools::{register_extension, unregister_extension};
use bridged_store_testing::helpers::init_tracing;
use bridged_store_testing::mocks::{DevtoolsCall, RecordingExtension};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Default, Serialize)]
struct Cart {
    items: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
enum CartAction {
    Add(String),
    Remove(String),
}

#[derive(Debug, PartialEq)]
struct NotInCart(String);

#[derive(Debug, Clone)]
struct CartReducer;

impl Reducer for CartReducer {
    type State = Cart;
    type Action = CartAction;
    type Error = NotInCart;

    fn reduce(&self, state: &Cart, action: CartAction) -> Result<Cart, NotInCart> {
        let mut next = state.clone();
        match action {
            CartAction::Add(item) => next.items.push(item),
            CartAction::Remove(item) => {
                let position = next
                    .items
                    .iter()
                    .position(|existing| *existing == item)
                    .ok_or(NotInCart(item))?;
                next.items.remove(position);
            },
        }
        Ok(next)
    }
}

#[test]
fn test_global_extension_absent_then_registered() {
    init_tracing();
    let extension = RecordingExtension::new();
    unregister_extension();

    // No handle: dispatching works and nothing is reported anywhere.
    let cart = create_container(CartReducer, Cart::default(), "cart");
    {
        let _provider = cart.provider();
        let dispatch = cart.use_dispatch();
        assert!(dispatch.dispatch(CartAction::Add("apple".into())).is_ok());
        assert_eq!(cart.use_state().items, vec!["apple".to_string()]);
    }
    assert!(extension.calls().is_empty());

    // Registered before mounting: one session, every accepted action in order.
    assert!(register_extension(extension.handle()).is_none());
    {
        let provider = cart.provider();
        let dispatch = cart.use_dispatch();
        assert!(dispatch.dispatch(CartAction::Add("apple".into())).is_ok());
        assert!(dispatch.dispatch(CartAction::Add("pear".into())).is_ok());
        assert_eq!(
            dispatch.dispatch(CartAction::Remove("plum".into())),
            Err(NotInCart("plum".into()))
        );
        assert!(dispatch.dispatch(CartAction::Remove("apple".into())).is_ok());

        assert_eq!(provider.state().items, vec!["pear".to_string()]);
    }

    assert_eq!(extension.sessions(), vec!["cart".to_string()]);
    assert_eq!(extension.inits(), vec![json!({ "items": [] })]);
    assert_eq!(
        extension.sends(),
        vec![
            (json!({ "Add": "apple" }), json!({ "items": ["apple"] })),
            (json!({ "Add": "pear" }), json!({ "items": ["apple", "pear"] })),
            (json!({ "Remove": "apple" }), json!({ "items": ["pear"] })),
        ]
    );
    assert!(matches!(
        extension.calls().first(),
        Some(DevtoolsCall::Connect(options)) if options.serialize
    ));

    // Unregistering does not detach mounted providers, but new mounts skip it.
    assert!(unregister_extension().is_some());
    extension.clear();
    {
        let _provider = cart.provider();
        assert!(cart.use_dispatch().dispatch(CartAction::Add("fig".into())).is_ok());
    }
    assert!(extension.calls().is_empty());
}
