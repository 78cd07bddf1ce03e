//! Server-rendered HTML pages.
//!
//! All user-supplied text goes through [`escape`] before it is embedded.

use crate::routes::Route;
use notekeeper_core::{messages_for, FieldError, Note, NoteDraft, SignupForm};
use std::fmt::Write;

/// Which note form is being rendered.
#[derive(Debug, Clone, Copy)]
pub enum NoteFormTarget<'a> {
    Add,
    Edit(&'a str),
}

pub fn home(username: Option<&str>) -> String {
    let body = match username {
        Some(name) => format!(
            "<h1>Заметки</h1><p>Вы вошли как {}.</p>\
             <p><a href=\"{}\">Мои заметки</a> · <a href=\"{}\">Добавить заметку</a></p>",
            escape(name),
            Route::List.path(),
            Route::Add.path()
        ),
        None => format!(
            "<h1>Заметки</h1><p>Чтобы вести заметки, <a href=\"{}\">войдите</a> \
             или <a href=\"{}\">зарегистрируйтесь</a>.</p>",
            Route::Login.path(),
            Route::Signup.path()
        ),
    };
    layout("Главная", &body)
}

pub fn notes_list(notes: &[Note]) -> String {
    let mut body = String::from("<h1>Мои заметки</h1>");
    if notes.is_empty() {
        body.push_str("<p class=\"empty\">Заметок пока нет.</p>");
    } else {
        body.push_str("<ul class=\"object-list\">");
        for note in notes {
            let _ = write!(
                body,
                "<li><a href=\"{}\">{}</a></li>",
                Route::Detail(&note.slug).path(),
                escape(&note.title)
            );
        }
        body.push_str("</ul>");
    }
    let _ = write!(
        body,
        "<p><a href=\"{}\">Добавить заметку</a></p>",
        Route::Add.path()
    );
    layout("Мои заметки", &body)
}

pub fn note_form(target: NoteFormTarget<'_>, draft: &NoteDraft, errors: &[FieldError]) -> String {
    let (heading, action) = match target {
        NoteFormTarget::Add => ("Добавить заметку", Route::Add.path()),
        NoteFormTarget::Edit(slug) => ("Редактировать заметку", Route::Edit(slug).path()),
    };

    let mut body = format!("<h1>{heading}</h1><form method=\"post\" action=\"{action}\">");
    body.push_str(&non_field_errors(errors));
    body.push_str(&input_row("title", "Заголовок", &draft.title, "text", errors));
    body.push_str(&textarea_row("text", "Текст", &draft.text, errors));
    body.push_str(&input_row(
        "slug",
        "Адрес для страницы с заметкой",
        draft.slug.as_deref().unwrap_or(""),
        "text",
        errors,
    ));
    body.push_str("<p class=\"help\">Укажите адрес для страницы заметки. Используйте только латиницу, цифры, дефисы и знаки подчёркивания. Если оставить поле пустым, адрес будет создан из заголовка.</p>");
    body.push_str("<button type=\"submit\">Сохранить</button></form>");
    layout(heading, &body)
}

pub fn note_detail(note: &Note) -> String {
    let body = format!(
        "<h1>{}</h1><div class=\"note-text\">{}</div>\
         <p><a href=\"{}\">Редактировать</a> · <a href=\"{}\">Удалить</a></p>",
        escape(&note.title),
        escape(&note.text),
        Route::Edit(&note.slug).path(),
        Route::Delete(&note.slug).path()
    );
    layout(&note.title, &body)
}

pub fn delete_confirm(note: &Note) -> String {
    let body = format!(
        "<h1>Удалить заметку «{}»?</h1>\
         <form method=\"post\" action=\"{}\"><button type=\"submit\">Удалить</button></form>\
         <p><a href=\"{}\">Отмена</a></p>",
        escape(&note.title),
        Route::Delete(&note.slug).path(),
        Route::Detail(&note.slug).path()
    );
    layout("Удаление заметки", &body)
}

pub fn success() -> String {
    let body = format!(
        "<h1>Успешно!</h1><p>Изменения сохранены.</p><p><a href=\"{}\">К списку заметок</a></p>",
        Route::List.path()
    );
    layout("Успешно", &body)
}

pub fn login(next: Option<&str>, errors: &[FieldError], username: &str) -> String {
    let mut body = format!(
        "<h1>Вход</h1><form method=\"post\" action=\"{}\">",
        Route::Login.path()
    );
    body.push_str(&non_field_errors(errors));
    body.push_str(&input_row("username", "Имя пользователя", username, "text", errors));
    body.push_str(&input_row("password", "Пароль", "", "password", errors));
    if let Some(next) = next {
        let _ = write!(
            body,
            "<input type=\"hidden\" name=\"next\" value=\"{}\">",
            escape(next)
        );
    }
    let _ = write!(
        body,
        "<button type=\"submit\">Войти</button></form><p>Нет аккаунта? <a href=\"{}\">Зарегистрируйтесь</a>.</p>",
        Route::Signup.path()
    );
    layout("Вход", &body)
}

pub fn logged_out() -> String {
    let body = format!(
        "<h1>Вы вышли из своей учётной записи</h1><p><a href=\"{}\">Войти снова</a></p>",
        Route::Login.path()
    );
    layout("Выход", &body)
}

pub fn signup(form: &SignupForm, errors: &[FieldError]) -> String {
    let mut body = format!(
        "<h1>Регистрация</h1><form method=\"post\" action=\"{}\">",
        Route::Signup.path()
    );
    body.push_str(&input_row("username", "Имя пользователя", &form.username, "text", errors));
    body.push_str(&input_row("password1", "Пароль", "", "password", errors));
    body.push_str(&input_row(
        "password2",
        "Подтверждение пароля",
        "",
        "password",
        errors,
    ));
    body.push_str("<button type=\"submit\">Зарегистрироваться</button></form>");
    layout("Регистрация", &body)
}

pub fn not_found() -> String {
    layout("Не найдено", "<h1>Страница не найдена</h1>")
}

pub fn bad_request() -> String {
    layout("Ошибка запроса", "<h1>Некорректный запрос</h1>")
}

pub fn server_error() -> String {
    layout("Ошибка", "<h1>Внутренняя ошибка сервера</h1>")
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"ru\"><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body><nav><a href=\"{}\">Главная</a> <a href=\"{}\">Заметки</a> \
         <a href=\"{}\">Выйти</a></nav><main>{}</main></body></html>",
        escape(title),
        Route::Home.path(),
        Route::List.path(),
        Route::Logout.path(),
        body
    )
}

fn input_row(name: &str, label: &str, value: &str, kind: &str, errors: &[FieldError]) -> String {
    format!(
        "<p>{}<label for=\"id_{name}\">{label}</label> \
         <input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{}\"></p>",
        error_list(name, errors),
        escape(value)
    )
}

fn textarea_row(name: &str, label: &str, value: &str, errors: &[FieldError]) -> String {
    format!(
        "<p>{}<label for=\"id_{name}\">{label}</label> \
         <textarea name=\"{name}\" id=\"id_{name}\">{}</textarea></p>",
        error_list(name, errors),
        escape(value)
    )
}

fn non_field_errors(errors: &[FieldError]) -> String {
    error_list("__all__", errors)
}

fn error_list(field: &str, errors: &[FieldError]) -> String {
    let messages = messages_for(errors, field);
    if messages.is_empty() {
        return String::new();
    }
    let mut out = format!("<ul class=\"errorlist\" id=\"errors_{field}\">");
    for message in messages {
        let _ = write!(out, "<li>{}</li>", escape(message));
    }
    out.push_str("</ul>");
    out
}
