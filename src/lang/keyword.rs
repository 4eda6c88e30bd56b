/// ## Reserved words
///
/// Every reserved word belongs to exactly one category. The lexer
/// consults functions first, then statements, then commands.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Statement,
    Command,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statements
    Goto,
    Gosub,
    Return,
    Print,
    If,
    Then,
    End,
    Data,
    Restore,
    Read,
    On,
    Rem,
    For,
    To,
    Next,
    Step,
    Name,
    Let,
    Input,
    Stop,
    Dim,
    Randomize,
    Tron,
    Troff,
    Do,
    Loop,
    While,
    Until,
    Cls,
    Color,
    Say,
    Splay,
    Plot,
    Pline,
    Pcircle,
    Pcls,
    Send,
    Wakeup,
    Kill,
    // Commands
    New,
    Run,
    List,
    Cat,
    Del,
    Resume,
    Bye,
    Save,
    Load,
    Dump,
    Cont,
    Cmds,
    Dir,
    Renumber,
    // Functions
    Rnd,
    Int,
    Sin,
    Cos,
    Tan,
    Atn,
    Sqr,
    Max,
    Min,
    Abs,
    NameS,
    Tid,
    LeftS,
    RightS,
    MidS,
    ChrS,
    Len,
    Val,
    SpcS,
    Log,
    Sgn,
    Tab,
    StrS,
    InkeyS,
    Time,
    IpS,
}

#[derive(Debug)]
pub struct Entry {
    pub keyword: Keyword,
    pub spelling: &'static str,
    pub category: Category,
    pub help: &'static str,
}

macro_rules! entry {
    ($kw:ident, $s:expr, $cat:ident, $help:expr) => {
        Entry {
            keyword: Keyword::$kw,
            spelling: $s,
            category: Category::$cat,
            help: $help,
        }
    };
}

static TABLE: &[Entry] = &[
    entry!(Goto, "GOTO", Statement, "jump to another line"),
    entry!(Gosub, "GOSUB", Statement, "jump to subroutine and save return"),
    entry!(Return, "RETURN", Statement, "return from subroutine"),
    entry!(Print, "PRINT", Statement, "output text and variables"),
    entry!(If, "IF", Statement, "test condition and possibly do a branch"),
    entry!(Then, "THEN", Statement, "alternative path for if statement"),
    entry!(End, "END", Statement, "end program execution"),
    entry!(Data, "DATA", Statement, "define list of values"),
    entry!(Restore, "RESTORE", Statement, "reset internal data read pointer"),
    entry!(Read, "READ", Statement, "read values from the data list"),
    entry!(On, "ON", Statement, "precede goto or gosub statement"),
    entry!(Rem, "REM", Statement, "line comment"),
    entry!(For, "FOR", Statement, "begins for loop"),
    entry!(To, "TO", Statement, "before last value in for loop"),
    entry!(Next, "NEXT", Statement, "execute next looping"),
    entry!(Step, "STEP", Statement, "step width of for loop"),
    entry!(Name, "NAME", Statement, "give this session a name"),
    entry!(Let, "LET", Statement, "assign values to variables"),
    entry!(Input, "INPUT", Statement, "input values into variables"),
    entry!(Stop, "STOP", Statement, "stop the program"),
    entry!(Dim, "DIM", Statement, "define arrays"),
    entry!(Randomize, "RANDOMIZE", Statement, "initialize random generator"),
    entry!(Tron, "TRON", Statement, "start trace mode"),
    entry!(Troff, "TROFF", Statement, "end trace mode"),
    entry!(Do, "DO", Statement, "begin a DO ... LOOP block"),
    entry!(Loop, "LOOP", Statement, "end of DO block, with optional condition"),
    entry!(While, "WHILE", Statement, "loop while condition is true"),
    entry!(Until, "UNTIL", Statement, "loop until condition is true"),
    entry!(Cls, "CLS", Statement, "clear BASIC window"),
    entry!(Color, "COLOR", Statement, "set background and text colors"),
    entry!(Say, "SAY", Statement, "speak out a text"),
    entry!(Splay, "SPLAY", Statement, "run MIDI sequencer"),
    entry!(Plot, "PLOT", Statement, "plot point in graphics window"),
    entry!(Pline, "PLINE", Statement, "draw line"),
    entry!(Pcircle, "PCIRCLE", Statement, "draw circle"),
    entry!(Pcls, "PCLS", Statement, "clear plotter window"),
    entry!(Send, "SEND", Statement, "send msg to another session"),
    entry!(Wakeup, "WAKEUP", Statement, "wake a session up"),
    entry!(Kill, "KILL", Statement, "kill another session"),
    entry!(New, "NEW", Command, "erase program in memory"),
    entry!(Run, "RUN", Command, "run program"),
    entry!(List, "LIST", Command, "list program"),
    entry!(Cat, "CAT", Command, "show file content"),
    entry!(Del, "DEL", Command, "delete a file"),
    entry!(Resume, "RESUME", Command, "resume stopped program"),
    entry!(Bye, "BYE", Command, "leave BASIC"),
    entry!(Save, "SAVE", Command, "save program to disk"),
    entry!(Load, "LOAD", Command, "load program from disk"),
    entry!(Dump, "DUMP", Command, "dump variables"),
    entry!(Cont, "CONT", Command, "continue after a break"),
    entry!(Cmds, "CMDS", Command, "generate sorted list of commands"),
    entry!(Dir, "DIR", Command, "show current directory"),
    entry!(Renumber, "RENUMBER", Command, "renumber program lines"),
    entry!(Rnd, "RND", Function, "get a random number"),
    entry!(Int, "INT", Function, "strip fraction from number"),
    entry!(Sin, "SIN", Function, "sine"),
    entry!(Cos, "COS", Function, "cosine"),
    entry!(Tan, "TAN", Function, "tangent"),
    entry!(Atn, "ATN", Function, "arctangent"),
    entry!(Sqr, "SQR", Function, "square root"),
    entry!(Max, "MAX", Function, "greater of 2 values"),
    entry!(Min, "MIN", Function, "smaller of 2 values"),
    entry!(Abs, "ABS", Function, "strips off the sign of a negative value"),
    entry!(NameS, "NAME$", Function, "get the session name"),
    entry!(Tid, "TID", Function, "get the session id"),
    entry!(LeftS, "LEFT$", Function, "get left part of string"),
    entry!(RightS, "RIGHT$", Function, "get right part of string"),
    entry!(MidS, "MID$", Function, "get middle part of string"),
    entry!(ChrS, "CHR$", Function, "make character from integer"),
    entry!(Len, "LEN", Function, "get string length"),
    entry!(Val, "VAL", Function, "read number from string"),
    entry!(SpcS, "SPC$", Function, "create a string of n spaces"),
    entry!(Log, "LOG", Function, "natural logarithm of n"),
    entry!(Sgn, "SGN", Function, "get sign of number, 1 or -1"),
    entry!(Tab, "TAB", Function, "pad output to column n"),
    entry!(StrS, "STR$", Function, "convert number to string"),
    entry!(InkeyS, "INKEY$", Function, "get the last key the user typed"),
    entry!(Time, "TIME", Function, "get free running timer value"),
    entry!(IpS, "IP$", Function, "look up the address of a host"),
];

impl Keyword {
    /// Classify a lowercased word. Functions shadow statements which
    /// shadow commands.
    pub fn lookup(word: &str) -> Option<Keyword> {
        [Category::Function, Category::Statement, Category::Command]
            .iter()
            .find_map(|cat| {
                TABLE
                    .iter()
                    .find(|e| e.category == *cat && e.spelling.eq_ignore_ascii_case(word))
                    .map(|e| e.keyword)
            })
    }

    fn entry(self) -> &'static Entry {
        match TABLE.iter().find(|e| e.keyword == self) {
            Some(e) => e,
            None => unreachable!("keyword missing from table"),
        }
    }

    pub fn spelling(self) -> &'static str {
        self.entry().spelling
    }

    pub fn category(self) -> Category {
        self.entry().category
    }

    pub fn help(self) -> &'static str {
        self.entry().help
    }

    /// All statements, commands, and functions whose spelling contains
    /// `filter`, sorted by spelling.
    pub fn search(filter: &str) -> Vec<&'static Entry> {
        let filter = filter.to_ascii_uppercase();
        let mut v: Vec<&'static Entry> = TABLE
            .iter()
            .filter(|e| filter.is_empty() || e.spelling.contains(&filter))
            .collect();
        v.sort_by_key(|e| e.spelling);
        v
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.spelling())
    }
}
