#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::LoxError;
use rox::session::{RunError, Session};

/// In-memory sink for `print` output that the test can read back.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `source` in a fresh session; returns what it printed and how it ended.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let buffer = SharedBuffer::default();
    let mut session = Session::with_writer(buffer.clone());
    let result = session.run(source);
    (buffer.contents(), result)
}

/// Run a program that must succeed and return its output.
pub fn output_of(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(e) = result {
        panic!("program failed: {:?}\noutput so far:\n{}", e, output);
    }
    output
}

/// Rendered static errors of a program that must fail before running.
pub fn static_errors(source: &str) -> Vec<String> {
    let (output, result) = run(source);
    assert_eq!(output, "", "nothing may run after a static error");
    match result {
        Err(RunError::Static(errors)) => errors.iter().map(LoxError::to_string).collect(),
        other => panic!("expected static errors, got {:?}", other),
    }
}

/// Output and rendered runtime error of a program that must fail while running.
pub fn runtime_error(source: &str) -> (String, String) {
    let (output, result) = run(source);
    match result {
        Err(RunError::Runtime(e)) => (output, e.to_string()),
        other => panic!("expected a runtime error, got {:?}", other),
    }
}
