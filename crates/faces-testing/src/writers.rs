use std::io;

use faces_core::ResponseWriter;

/// Accepts `budget` element starts, then fails every write.
pub struct FailingWriter {
    budget: usize,
}

impl FailingWriter {
    pub fn after(budget: usize) -> Self {
        Self { budget }
    }

    fn spend(&mut self) -> io::Result<()> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "response closed"));
        }
        self.budget -= 1;
        Ok(())
    }
}

impl ResponseWriter for FailingWriter {
    fn start_element(&mut self, _name: &str, _client_id: &str) -> io::Result<()> {
        self.spend()
    }

    fn write_text(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn end_element(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }
}
