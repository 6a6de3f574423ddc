//! `import Location as Alias : { a, b as c }`

use extra_diagnostic::ErrorCode;
use extra_ir::{Identifier, ImportDef, ImportLocation, ImportName};

use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    pub(super) fn import_def(&mut self) -> ParseResult<ImportDef> {
        self.scanner.expect_word("import")?;
        self.skip_trivia()?;
        let location = if self.scanner.is_at("'") || self.scanner.is_at("\"") {
            ImportLocation::File(self.string_literal()?.value)
        } else {
            ImportLocation::Package(self.package_path()?)
        };
        let alias = self.import_alias()?;

        let has_names = self.scanner.test(|s| -> ParseResult<bool> {
            s.scan_spaces()?;
            Ok(s.is_at(":") && !s.is_at("::"))
        })?;
        let mut names = Vec::new();
        if has_names {
            self.skip_spaces()?;
            self.scanner.advance();
            self.skip_trivia()?;
            let open = self.scanner.pos();
            self.scanner.expect_string("{")?;
            let config = SeriesConfig::new("{", "}", open).keep_closing_comments();
            names = self.series(&config, Self::import_name)?.items;
        }
        Ok(ImportDef {
            location,
            alias,
            names,
        })
    }

    /// `Foo/Bar/Baz`
    fn package_path(&mut self) -> ParseResult<Vec<String>> {
        let mut segments = Vec::new();
        loop {
            let Some(segment) = self.scanner.scan_word() else {
                return Err(self.expected(ErrorCode::E1004, "a package name"));
            };
            segments.push(segment.to_string());
            if !self.scanner.scan_if_string("/") {
                return Ok(segments);
            }
        }
    }

    /// ` as Name`, if present on the same line.
    fn import_alias(&mut self) -> ParseResult<Option<Identifier>> {
        let has_alias = self.scanner.test(|s| -> ParseResult<bool> {
            s.scan_spaces()?;
            Ok(s.is_at_word("as"))
        })?;
        if !has_alias {
            return Ok(None);
        }
        self.skip_spaces()?;
        self.scanner.advance_by(2);
        self.skip_trivia()?;
        Ok(Some(self.identifier()?))
    }

    fn import_name(&mut self) -> ParseResult<ImportName> {
        let name = self.identifier()?;
        let alias = self.import_alias()?;
        Ok(ImportName { name, alias })
    }
}
