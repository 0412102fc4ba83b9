// Create the Error, ErrorKind, ResultExt, and Result types.
// Result is a typedef of std `Result` with the error type our own `Error`.
// ResultExt adds the `chain_err` trait method.
#![allow(deprecated)]

error_chain! {

    errors {
        IndexOutOfBounds(index: String, bounds: String) {
            description("index out of bounds")
            display("index {} is outside of {}", index, bounds)
        }
        InvalidArgument(reason: String) {
            description("invalid argument")
            display("invalid argument: {}", reason)
        }
    }
}

pub(crate) fn index_out_of_bounds(index: usize, len: usize) -> Error {
    ErrorKind::IndexOutOfBounds(index.to_string(), format!("0..{}", len)).into()
}

pub(crate) fn coordinate_out_of_bounds(x: u32, y: u32, width: usize, height: usize) -> Error {
    ErrorKind::IndexOutOfBounds(format!("({}, {})", x, y),
                                format!("a {}x{} grid", width, height))
        .into()
}
