use super::{Column, LineNumber};

pub struct Error {
    code: u16,
    line_number: LineNumber,
    column: Column,
    message: String,
    statement: Option<String>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            column: 0..0,
            message: String::new(),
            statement: None,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is_syntax(&self) -> bool {
        self.code == ErrorCode::SyntaxError as u16
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn message_text(&self) -> &str {
        &self.message
    }

    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    pub fn in_line_number(mut self, line: LineNumber) -> Error {
        if self.line_number.is_none() {
            self.line_number = line;
        }
        self
    }

    pub fn in_column(mut self, column: &Column) -> Error {
        self.column = column.clone();
        self
    }

    /// Attach the source text of the statement that raised this error.
    /// The first statement to claim an error keeps it.
    pub fn in_statement(mut self, text: &str) -> Error {
        if self.statement.is_none() {
            self.statement = Some(text.to_string());
        }
        self
    }

    pub fn message<S: Into<String>>(mut self, message: S) -> Error {
        self.message = message.into();
        self
    }

    fn code_str(&self) -> &'static str {
        match self.code {
            1 => "NEXT WITHOUT FOR",
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            4 => "OUT OF DATA",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            8 => "UNDEFINED LINE",
            9 => "SUBSCRIPT OUT OF RANGE",
            10 => "REDIMENSIONED ARRAY",
            11 => "DIVISION BY ZERO",
            13 => "TYPE MISMATCH",
            17 => "CAN'T CONTINUE",
            31 => "LOOP WITHOUT DO",
            32 => "UNDEFINED VARIABLE",
            33 => "INTERRUPTED",
            51 => "INTERNAL ERROR",
            53 => "FILE NOT FOUND",
            57 => "DISK I/O ERROR",
            73 => "FEATURE UNAVAILABLE",
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    OutOfData = 4,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    UndefinedLine = 8,
    SubscriptOutOfRange = 9,
    RedimensionedArray = 10,
    DivisionByZero = 11,
    TypeMismatch = 13,
    CantContinue = 17,
    LoopWithoutDo = 31,
    UndefinedVariable = 32,
    Interrupted = 33,
    InternalError = 51,
    FileNotFound = 53,
    DiskIoError = 57,
    FeatureUnavailable = 73,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = self.code_str();
        if self.is_syntax() {
            write!(f, "{}", code_str)?;
            if !self.message.is_empty() {
                write!(f, ": {}", self.message)?;
            }
        } else if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !code_str.is_empty() {
            write!(f, "{}", code_str)?;
        } else {
            write!(f, "PROGRAM ERROR {}", self.code)?;
        }
        if let Some(line_number) = self.line_number {
            write!(f, " IN {}", line_number)?;
        }
        if let Some(text) = &self.statement {
            write!(f, ": {}", text)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_runtime() {
        let e = error!(DivisionByZero; "divide by zero")
            .in_statement("PRINT 1/0")
            .in_line_number(Some(10));
        assert_eq!(e.to_string(), "divide by zero IN 10: PRINT 1/0");
        assert!(!e.is_syntax());
    }

    #[test]
    fn test_display_syntax() {
        let e = error!(SyntaxError, ..&(3..4); "missing = in assignment statement.");
        assert_eq!(
            e.to_string(),
            "SYNTAX ERROR: missing = in assignment statement."
        );
        assert!(e.is_syntax());
        assert_eq!(e.column(), 3..4);
    }

    #[test]
    fn test_display_code_only() {
        assert_eq!(error!(CantContinue).to_string(), "CAN'T CONTINUE");
    }
}
