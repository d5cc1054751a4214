// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing: usings, namespaces, types and members.

use ecow::EcoString;

use super::Parser;
use crate::ast::{
    CompilationUnit, FieldDeclaration, Member, MethodDeclaration, Modifier, Modifiers, Parameter,
    PredefinedType, QualifiedName, TypeDeclaration, TypeDeclarationKind, TypeSyntax,
};
use crate::source_analysis::{Keyword, Span, TokenKind};

impl Parser {
    /// Parses a whole file.
    pub(super) fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut unit = CompilationUnit {
            usings: Vec::new(),
            types: Vec::new(),
            span: Span::default(),
        };
        self.parse_namespace_body(None, &mut unit, false);
        let end = self.current_token().span().end();
        unit.span = Span::new(0, end);
        unit
    }

    /// Parses declarations until EOF, or until the closing `}` when `closing`.
    fn parse_namespace_body(
        &mut self,
        namespace: Option<&EcoString>,
        unit: &mut CompilationUnit,
        closing: bool,
    ) {
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    if closing {
                        self.error_expected("`}` to close the namespace");
                    }
                    return;
                }
                TokenKind::RightBrace if closing => {
                    self.advance();
                    return;
                }
                TokenKind::Keyword(Keyword::Using) => {
                    if let Some(name) = self.parse_using() {
                        unit.usings.push(name);
                    }
                }
                TokenKind::Keyword(Keyword::Namespace) => self.parse_namespace(namespace, unit),
                _ if self.at_type_declaration_start() => {
                    if let Some(declaration) = self.parse_type_declaration(namespace) {
                        unit.types.push(declaration);
                    }
                }
                _ => {
                    self.error_expected("a type declaration");
                    self.recover_to_declaration();
                }
            }
        }
    }

    /// `using A.B;`
    fn parse_using(&mut self) -> Option<QualifiedName> {
        self.advance();
        let Some(name) = self.parse_qualified_name("a namespace name") else {
            self.synchronize_statement();
            return None;
        };
        self.expect(&TokenKind::Semicolon, "`;`");
        Some(name)
    }

    /// `namespace A.B { ... }` or the file-scoped `namespace A.B;`
    fn parse_namespace(&mut self, outer: Option<&EcoString>, unit: &mut CompilationUnit) {
        self.advance();
        let Some(name) = self.parse_qualified_name("a namespace name") else {
            self.recover_to_declaration();
            return;
        };
        let full_name = match outer {
            Some(outer) => EcoString::from(format!("{outer}.{}", name.dotted())),
            None => name.dotted(),
        };

        if self.match_token(&TokenKind::Semicolon) {
            self.parse_namespace_body(Some(&full_name), unit, false);
            return;
        }
        if !self.check(&TokenKind::LeftBrace) {
            self.error_expected("`{` or `;`");
            self.recover_to_declaration();
            return;
        }
        if !self.enter_nesting() {
            self.skip_balanced();
            return;
        }
        self.advance();
        self.parse_namespace_body(Some(&full_name), unit, true);
        self.leave_nesting();
    }

    /// Returns `true` if the current position starts a class or interface.
    fn at_type_declaration_start(&self) -> bool {
        let mut offset = 0;
        while let TokenKind::Keyword(keyword) = self.peek_kind_at(offset) {
            if keyword.is_modifier() {
                offset += 1;
            } else {
                return matches!(keyword, Keyword::Class | Keyword::Interface);
            }
        }
        false
    }

    /// Skips at least one token, then up to the next plausible declaration.
    fn recover_to_declaration(&mut self) {
        self.skip_balanced();
        while !self.is_at_end()
            && !self.check(&TokenKind::RightBrace)
            && !self.check_keyword(Keyword::Using)
            && !self.check_keyword(Keyword::Namespace)
            && !self.at_type_declaration_start()
        {
            self.skip_balanced();
        }
    }

    /// Parses a `class` or `interface` declaration.
    fn parse_type_declaration(&mut self, namespace: Option<&EcoString>) -> Option<TypeDeclaration> {
        let start = self.current_token().span();
        let modifiers = self.parse_modifiers();
        let kind = if self.match_keyword(Keyword::Class) {
            TypeDeclarationKind::Class
        } else if self.match_keyword(Keyword::Interface) {
            TypeDeclarationKind::Interface
        } else {
            self.error_expected("`class` or `interface`");
            self.recover_to_declaration();
            return None;
        };
        let Some(name) = self.expect_identifier("a type name") else {
            self.recover_to_declaration();
            return None;
        };

        let mut base_list = Vec::new();
        if self.match_token(&TokenKind::Colon) {
            loop {
                if let Some(ty) = self.parse_type("a base type") {
                    base_list.push(ty);
                }
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let mut members = Vec::new();
        if self.expect(&TokenKind::LeftBrace, "`{`").is_some() {
            while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
                if self.at_type_declaration_start() {
                    let span = self.current_token().span();
                    self.error_at("nested type declarations are not supported", span);
                    while !self.is_at_end() && !self.check(&TokenKind::LeftBrace) {
                        self.advance();
                    }
                    self.skip_balanced();
                    continue;
                }
                match self.parse_member(&name.name) {
                    Some(member) => members.push(member),
                    None => self.recover_to_member(),
                }
            }
            self.expect(&TokenKind::RightBrace, "`}` to close the type");
            self.match_token(&TokenKind::Semicolon);
        } else {
            self.recover_to_declaration();
        }

        Some(TypeDeclaration {
            kind,
            modifiers,
            name,
            namespace: namespace.cloned(),
            base_list,
            members,
            span: self.span_from(start),
        })
    }

    /// Parses the modifier list of a declaration.
    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        while let TokenKind::Keyword(keyword) = *self.current_kind() {
            let Some(modifier) = modifier_for(keyword) else {
                break;
            };
            let span = self.advance().span();
            if modifiers.has(modifier) {
                self.error_at(format!("duplicate modifier `{keyword}`"), span);
            } else {
                modifiers.items.push((modifier, span));
            }
        }
        modifiers
    }

    /// Returns `true` if the current position plausibly starts a member.
    fn at_member_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Keyword(keyword) => {
                keyword.is_modifier()
                    || keyword.is_predefined_type()
                    || matches!(keyword, Keyword::Class | Keyword::Interface)
            }
            TokenKind::Identifier(_) => matches!(
                self.peek_kind_at(1),
                TokenKind::Identifier(_) | TokenKind::LeftParen | TokenKind::Dot
            ),
            _ => false,
        }
    }

    /// Skips to the next plausible member, never past the closing `}`.
    fn recover_to_member(&mut self) {
        if !self.is_at_end() && !self.check(&TokenKind::RightBrace) {
            self.skip_balanced();
        }
        while !self.is_at_end() && !self.check(&TokenKind::RightBrace) && !self.at_member_start() {
            self.skip_balanced();
        }
    }

    /// Parses one method, constructor or field.
    fn parse_member(&mut self, type_name: &str) -> Option<Member> {
        let start = self.current_token().span();
        let modifiers = self.parse_modifiers();

        let is_constructor = matches!(self.current_kind(), TokenKind::Identifier(name) if name == type_name)
            && self.peek_kind_at(1) == &TokenKind::LeftParen;
        let return_type = if is_constructor {
            TypeSyntax::Predefined(PredefinedType::Void, self.current_token().span())
        } else {
            self.parse_type("a member type")?
        };
        let name = self.expect_identifier("a member name")?;

        if !self.check(&TokenKind::LeftParen) {
            let initializer = if self.match_token(&TokenKind::Assign) {
                Some(self.parse_expression())
            } else {
                None
            };
            self.expect(&TokenKind::Semicolon, "`;`");
            return Some(Member::Field(FieldDeclaration {
                modifiers,
                ty: return_type,
                name,
                initializer,
                span: self.span_from(start),
            }));
        }

        let parameters = self.parse_parameter_list();
        if is_constructor && self.match_token(&TokenKind::Colon) {
            if self.check_keyword(Keyword::Base) || self.check_keyword(Keyword::This) {
                let _initializer = self.parse_expression();
            } else {
                self.error_expected("`base` or `this`");
            }
        }

        let body = if self.check(&TokenKind::LeftBrace) {
            Some(self.parse_block())
        } else {
            if !self.match_token(&TokenKind::Semicolon) {
                self.error_expected("a method body or `;`");
            }
            None
        };

        Some(Member::Method(MethodDeclaration {
            modifiers,
            return_type,
            name,
            parameters,
            body,
            is_constructor,
            span: self.span_from(start),
        }))
    }

    /// `( [Type name {, Type name}] )`
    fn parse_parameter_list(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        self.advance();
        if self.match_token(&TokenKind::RightParen) {
            return parameters;
        }
        loop {
            let start = self.current_token().span();
            let Some(ty) = self.parse_type("a parameter type") else {
                break;
            };
            let Some(name) = self.expect_identifier("a parameter name") else {
                break;
            };
            parameters.push(Parameter {
                ty,
                name,
                span: self.span_from(start),
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        if self.expect(&TokenKind::RightParen, "`)`").is_none() {
            while !self.is_at_end()
                && !matches!(
                    self.current_kind(),
                    TokenKind::RightParen
                        | TokenKind::LeftBrace
                        | TokenKind::RightBrace
                        | TokenKind::Semicolon
                )
            {
                self.advance();
            }
            self.match_token(&TokenKind::RightParen);
        }
        parameters
    }

    /// Parses a type: a predefined keyword type or a qualified name.
    pub(super) fn parse_type(&mut self, what: &str) -> Option<TypeSyntax> {
        if let TokenKind::Keyword(keyword) = *self.current_kind() {
            if let Some(predefined) = predefined_type_for(keyword) {
                let span = self.advance().span();
                return Some(TypeSyntax::Predefined(predefined, span));
            }
        }
        if self.current_kind().is_identifier() {
            return self.parse_qualified_name(what).map(TypeSyntax::Named);
        }
        self.error_expected(what);
        None
    }
}

fn modifier_for(keyword: Keyword) -> Option<Modifier> {
    Some(match keyword {
        Keyword::Public => Modifier::Public,
        Keyword::Protected => Modifier::Protected,
        Keyword::Private => Modifier::Private,
        Keyword::Internal => Modifier::Internal,
        Keyword::Static => Modifier::Static,
        Keyword::Abstract => Modifier::Abstract,
        Keyword::Virtual => Modifier::Virtual,
        Keyword::Override => Modifier::Override,
        Keyword::Sealed => Modifier::Sealed,
        Keyword::New => Modifier::New,
        _ => return None,
    })
}

pub(super) fn predefined_type_for(keyword: Keyword) -> Option<PredefinedType> {
    Some(match keyword {
        Keyword::Bool => PredefinedType::Bool,
        Keyword::Int => PredefinedType::Int,
        Keyword::Object => PredefinedType::Object,
        Keyword::String => PredefinedType::String,
        Keyword::Void => PredefinedType::Void,
        _ => return None,
    })
}
