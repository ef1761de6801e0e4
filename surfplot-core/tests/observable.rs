use std::cell::RefCell;
use std::rc::Rc;
use surfplot_core::{AnyOption, Observable};

#[test]
fn change_reads_back_and_notifies_each_observer_once() {
    let option = Observable::new(-50.0_f64);
    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&first);
    option.connect(move |value| sink.borrow_mut().push(*value));
    let sink = Rc::clone(&second);
    option.connect(move |value| sink.borrow_mut().push(*value));

    for value in [12.5, -3.0, 1e9] {
        option.change(value);
        assert_eq!(option.value(), value);
    }

    assert_eq!(*first.borrow(), vec![12.5, -3.0, 1e9]);
    assert_eq!(*second.borrow(), vec![12.5, -3.0, 1e9]);
}

#[test]
fn writing_an_equal_value_still_notifies() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let option = Observable::with_observer(20_i64, move |_| *counter.borrow_mut() += 1);

    option.change(20);
    option.change(20);

    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn disconnected_observer_is_not_called() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let option = Observable::new(String::from("x"));
    let id = option.connect(move |_| *counter.borrow_mut() += 1);

    option.change("y".to_string());
    assert!(option.disconnect(id));
    assert!(!option.disconnect(id));
    option.change("z".to_string());

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(option.subscriber_count(), 0);
}

#[test]
fn clones_share_the_same_value() {
    let option = Observable::new(1_i64);
    let handle = option.clone();
    handle.change(7);
    assert_eq!(option.value(), 7);
}

#[test]
fn write_from_inside_an_observer_reaches_everyone() {
    let option = Observable::new(0_i64);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let clamp = option.clone();
    option.connect(move |value| {
        if *value > 10 {
            clamp.change(10);
        }
    });
    let sink = Rc::clone(&seen);
    option.connect(move |value| sink.borrow_mut().push(*value));

    option.change(42);

    assert_eq!(option.value(), 10);
    assert_eq!(seen.borrow().last(), Some(&10));
}

#[test]
fn observer_can_disconnect_itself_while_notified() {
    let option = Observable::new(0_i64);
    let calls = Rc::new(RefCell::new(0));
    let id = Rc::new(RefCell::new(None));

    let handle = option.clone();
    let own_id = Rc::clone(&id);
    let counter = Rc::clone(&calls);
    let subscription = option.connect(move |_| {
        *counter.borrow_mut() += 1;
        if let Some(id) = own_id.borrow_mut().take() {
            handle.disconnect(id);
        }
    });
    *id.borrow_mut() = Some(subscription);

    option.change(1);
    option.change(2);

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn observer_connected_while_notified_starts_on_the_next_change() {
    let option = Observable::new(0_i64);
    let late = Rc::new(RefCell::new(Vec::new()));

    let handle = option.clone();
    let sink = Rc::clone(&late);
    let mut connected = false;
    option.connect(move |_| {
        if !connected {
            connected = true;
            let sink = Rc::clone(&sink);
            handle.connect(move |value| sink.borrow_mut().push(*value));
        }
    });

    option.change(1);
    assert!(late.borrow().is_empty());
    assert_eq!(option.subscriber_count(), 2);

    option.change(2);
    assert_eq!(*late.borrow(), vec![2]);
    assert_eq!(option.subscriber_count(), 2);
}

#[test]
fn any_option_reports_its_kind() {
    assert_eq!(AnyOption::from(Observable::new(1_i64)).kind(), "int");
    assert_eq!(AnyOption::from(Observable::new(1.0_f64)).kind(), "float");
    assert_eq!(AnyOption::from(Observable::new(String::new())).kind(), "str");
}
