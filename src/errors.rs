#![allow(missing_docs)]

pub use error_chain::bail;
use error_chain::error_chain;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Io(std::io::Error);
    }

    errors {
        Usage {
            description("too few arguments")
            display("expected five arguments: real_min real_max imag_min imag_max width")
        }
        Parse(msg: String) {
            description("could not parse argument")
            display("could not parse argument: {}", msg)
        }
        InvalidFrame(msg: String) {
            description("invalid frame")
            display("invalid frame: {}", msg)
        }
        UnknownColoring(name: String) {
            description("unknown coloring")
            display("unknown coloring '{}'", name)
        }
    }
}
