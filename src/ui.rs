use crate::catalog::{Category, CATEGORIES, FLOORS};
use crate::progress::{build_progress, CategoryProgress};
use crate::reset::display_timestamp;
use crate::store::ChecklistStore;
use chrono::{DateTime, Local};
use std::fmt::Write;

pub fn render_index(store: &ChecklistStore, active: &Category, now: DateTime<Local>) -> String {
    INDEX_HTML
        .replace("{{ACTIVE_TAB}}", active.id)
        .replace("{{TABS}}", &render_tabs(active))
        .replace("{{CONTENT}}", &render_tab_content(store, active))
        .replace("{{PROGRESS}}", &render_progress(&build_progress(store)))
        .replace("{{LAST_UPDATE}}", &display_timestamp(now))
}

pub fn render_tabs(active: &Category) -> String {
    let mut html = String::new();
    for category in &CATEGORIES {
        let class = if category.id == active.id { "tab active" } else { "tab" };
        let _ = write!(
            html,
            r#"<a class="{class}" href="/?tab={id}" data-id="{id}">{name}</a>"#,
            id = category.id,
            name = escape_html(category.name),
        );
    }
    html
}

pub fn render_tab_content(store: &ChecklistStore, active: &Category) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="controls">
        <form method="post" action="/categories/{id}/select-all"><button type="submit" id="selectAll">Alles auswählen</button></form>
        <form method="post" action="/categories/{id}/deselect-all"><button type="submit" id="deselectAll">Alle abwählen</button></form>
      </div>"#,
        id = active.id,
    );

    let entries = store.category_entries(active);
    for floor in &FLOORS {
        let _ = write!(
            html,
            r#"<div class="floor-separator">{}</div><div class="room-grid">"#,
            escape_html(&floor.label())
        );
        for room in floor.rooms {
            let entry = entries.and_then(|rooms| rooms.get(room)).cloned().unwrap_or_default();
            let checked = if entry.checked { " checked" } else { "" };
            let (note_class, note_label) = if entry.has_note() {
                ("note-btn has-note", "📝")
            } else {
                ("note-btn", "Notiz")
            };
            let _ = write!(
                html,
                r#"<div class="room-item">
          <form class="room-checkbox" method="post" action="/entries/{id}/{room}/toggle">
            <input type="checkbox" id="{id}-{room}" data-room="{room}"{checked} />
            <label for="{id}-{room}">{room}</label>
            <noscript><button type="submit">Umschalten</button></noscript>
          </form>
          <button type="button" class="{note_class}" data-room="{room}">{note_label}</button>
        </div>"#,
                id = active.id,
            );
        }
        html.push_str("</div>");
    }
    html
}

pub fn render_progress(progress: &[CategoryProgress]) -> String {
    let mut html = String::new();
    for item in progress {
        let _ = write!(
            html,
            r#"<div class="progress-item">
        <span class="progress-label">{name}</span>
        <div class="progress-bar"><div class="progress-fill" style="width: {percent:.2}%; background-color: {color}"></div></div>
        <span class="progress-text">{summary}</span>
      </div>"#,
            name = escape_html(item.name),
            percent = item.percent,
            color = item.tier.color_var(),
            summary = item.summary(),
        );
    }
    html
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Hotel Zimmerkontrolle</title>
  <style>
    :root {
      --color-bg: #f6f4ef;
      --color-card: #ffffff;
      --color-ink: #263238;
      --color-muted: #6b7479;
      --color-primary: #21808d;
      --color-border: rgba(38, 50, 56, 0.12);
      --color-error: #c0152f;
      --color-warning: #a84b2f;
      --color-success: #21808d;
      --shadow: 0 12px 32px rgba(38, 50, 56, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--color-bg);
      color: var(--color-ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      padding: 24px 16px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: baseline;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .meta {
      color: var(--color-muted);
      font-size: 0.9rem;
      display: flex;
      gap: 16px;
      align-items: center;
    }

    .card {
      background: var(--color-card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .progress-grid {
      display: grid;
      gap: 12px;
    }

    .progress-item {
      display: grid;
      grid-template-columns: 180px 1fr 140px;
      align-items: center;
      gap: 12px;
    }

    .progress-bar {
      height: 12px;
      background: var(--color-border);
      border-radius: 999px;
      overflow: hidden;
    }

    .progress-fill {
      height: 100%;
      border-radius: 999px;
      transition: width 200ms ease;
    }

    .progress-text {
      color: var(--color-muted);
      font-size: 0.9rem;
      text-align: right;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      margin-bottom: 16px;
    }

    .tab {
      padding: 8px 14px;
      border-radius: 999px;
      color: var(--color-muted);
      text-decoration: none;
      font-weight: 600;
      cursor: pointer;
      background: var(--color-border);
    }

    .tab.active {
      background: var(--color-primary);
      color: white;
    }

    .controls {
      display: flex;
      gap: 8px;
      margin-bottom: 12px;
    }

    .controls form {
      margin: 0;
    }

    button {
      border: 1px solid var(--color-border);
      background: white;
      border-radius: 8px;
      padding: 6px 12px;
      font-size: 0.9rem;
      cursor: pointer;
    }

    button.primary {
      background: var(--color-primary);
      border-color: var(--color-primary);
      color: white;
    }

    button.danger {
      color: var(--color-error);
      border-color: var(--color-error);
    }

    .floor-separator {
      margin: 18px 0 8px;
      font-weight: 600;
      color: var(--color-muted);
      border-bottom: 1px solid var(--color-border);
      padding-bottom: 4px;
    }

    .room-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(130px, 1fr));
      gap: 8px;
    }

    .room-item {
      display: flex;
      justify-content: space-between;
      align-items: center;
      border: 1px solid var(--color-border);
      border-radius: 8px;
      padding: 6px 8px;
    }

    .room-checkbox {
      display: flex;
      align-items: center;
      gap: 6px;
      margin: 0;
    }

    .note-btn {
      padding: 2px 8px;
      font-size: 0.8rem;
    }

    .note-btn.has-note {
      border-color: var(--color-primary);
    }

    .modal {
      display: none;
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.4);
    }

    .modal-content {
      background: white;
      width: min(480px, 92%);
      margin: 12vh auto 0;
      border-radius: 12px;
      padding: 20px;
      display: grid;
      gap: 12px;
    }

    .modal-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .close {
      cursor: pointer;
      font-size: 1.4rem;
    }

    textarea {
      width: 100%;
      min-height: 120px;
      font: inherit;
      padding: 8px;
    }

    .modal-actions {
      display: flex;
      justify-content: flex-end;
      gap: 8px;
    }

    @media (max-width: 640px) {
      .progress-item {
        grid-template-columns: 1fr;
      }
      .progress-text {
        text-align: left;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Hotel Zimmerkontrolle</h1>
      <div class="meta">
        <span>Letzte Aktualisierung: <span id="lastUpdate">{{LAST_UPDATE}}</span></span>
        <button type="button" class="danger" id="resetBtn">Alle Daten zurücksetzen</button>
      </div>
    </header>

    <section class="card">
      <h2>Fortschritt</h2>
      <div class="progress-grid" id="progressGrid">{{PROGRESS}}</div>
    </section>

    <section class="card">
      <div class="tabs">{{TABS}}</div>
      <div class="tab-content">{{CONTENT}}</div>
    </section>
  </main>

  <div class="modal" id="notesModal">
    <div class="modal-content">
      <div class="modal-header">
        <h3>Notiz für Zimmer <span id="modalRoomNumber"></span></h3>
        <span class="close">&times;</span>
      </div>
      <textarea id="noteTextarea" placeholder="Notiz eingeben..."></textarea>
      <div class="modal-actions">
        <button type="button" id="cancelNote">Abbrechen</button>
        <button type="button" class="primary" id="saveNote">Speichern</button>
      </div>
    </div>
  </div>

  <script>
    const tabsEl = document.querySelector('.tabs');
    const contentEl = document.querySelector('.tab-content');
    const progressEl = document.getElementById('progressGrid');
    const lastUpdateEl = document.getElementById('lastUpdate');
    const resetBtn = document.getElementById('resetBtn');
    const modal = document.getElementById('notesModal');
    const modalRoomEl = document.getElementById('modalRoomNumber');
    const noteTextarea = document.getElementById('noteTextarea');

    let snapshot = null;
    let activeTab = '{{ACTIVE_TAB}}';

    const tierColor = {
      error: 'var(--color-error)',
      warning: 'var(--color-warning)',
      success: 'var(--color-success)'
    };

    const api = async (method, url, body) => {
      const options = { method, headers: {} };
      if (body !== undefined) {
        options.headers['content-type'] = 'application/json';
        options.body = JSON.stringify(body);
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Anfrage fehlgeschlagen');
      }
      return res.json();
    };

    const entryFor = (category, room) => {
      const rooms = snapshot.entries[category] || {};
      return rooms[room] || { checked: false, note: '' };
    };

    const updateLastModified = () => {
      lastUpdateEl.textContent = new Date().toLocaleString('de-DE', {
        day: '2-digit',
        month: '2-digit',
        year: 'numeric',
        hour: '2-digit',
        minute: '2-digit'
      });
    };

    const renderTabs = () => {
      tabsEl.innerHTML = '';
      snapshot.categories.forEach((category) => {
        const tab = document.createElement('a');
        tab.className = 'tab' + (category.id === activeTab ? ' active' : '');
        tab.href = `/?tab=${category.id}`;
        tab.dataset.id = category.id;
        tab.textContent = category.name;
        tab.addEventListener('click', (event) => {
          event.preventDefault();
          activeTab = category.id;
          history.replaceState(null, '', tab.href);
          renderTabs();
          renderContent();
          renderProgress();
        });
        tabsEl.appendChild(tab);
      });
    };

    const renderContent = () => {
      contentEl.innerHTML = '';

      const controls = document.createElement('div');
      controls.className = 'controls';
      const selectAll = document.createElement('button');
      selectAll.textContent = 'Alles auswählen';
      selectAll.addEventListener('click', () => setAll(true));
      const deselectAll = document.createElement('button');
      deselectAll.textContent = 'Alle abwählen';
      deselectAll.addEventListener('click', () => setAll(false));
      controls.appendChild(selectAll);
      controls.appendChild(deselectAll);
      contentEl.appendChild(controls);

      snapshot.floors.forEach((floor) => {
        const label = document.createElement('div');
        label.className = 'floor-separator';
        label.textContent = floor.label;
        contentEl.appendChild(label);

        const grid = document.createElement('div');
        grid.className = 'room-grid';

        floor.rooms.forEach((room) => {
          const entry = entryFor(activeTab, room);
          const item = document.createElement('div');
          item.className = 'room-item';

          const wrap = document.createElement('div');
          wrap.className = 'room-checkbox';
          const checkbox = document.createElement('input');
          checkbox.type = 'checkbox';
          checkbox.id = `${activeTab}-${room}`;
          checkbox.checked = entry.checked;
          checkbox.addEventListener('change', (event) => setChecked(room, event.target.checked));
          const roomLabel = document.createElement('label');
          roomLabel.setAttribute('for', checkbox.id);
          roomLabel.textContent = room;
          wrap.appendChild(checkbox);
          wrap.appendChild(roomLabel);

          const noteBtn = document.createElement('button');
          noteBtn.type = 'button';
          noteBtn.className = 'note-btn';
          noteBtn.textContent = 'Notiz';
          if (entry.note && entry.note.trim() !== '') {
            noteBtn.classList.add('has-note');
            noteBtn.textContent = '📝';
          }
          noteBtn.addEventListener('click', () => openNoteModal(room));

          item.appendChild(wrap);
          item.appendChild(noteBtn);
          grid.appendChild(item);
        });

        contentEl.appendChild(grid);
      });
    };

    const renderProgress = () => {
      progressEl.innerHTML = '';
      snapshot.progress.forEach((item) => {
        const row = document.createElement('div');
        row.className = 'progress-item';

        const label = document.createElement('span');
        label.className = 'progress-label';
        label.textContent = item.name;

        const bar = document.createElement('div');
        bar.className = 'progress-bar';
        const fill = document.createElement('div');
        fill.className = 'progress-fill';
        fill.style.width = item.percent + '%';
        fill.style.backgroundColor = tierColor[item.tier];
        bar.appendChild(fill);

        const text = document.createElement('span');
        text.className = 'progress-text';
        text.textContent = `${item.completed} von ${item.total} erledigt`;

        row.appendChild(label);
        row.appendChild(bar);
        row.appendChild(text);
        progressEl.appendChild(row);
      });
    };

    const renderAll = () => {
      renderTabs();
      renderContent();
      renderProgress();
      resetBtn.style.display = snapshot.backend === 'local' ? '' : 'none';
    };

    const setChecked = async (room, checked) => {
      try {
        snapshot = await api('PUT', `/api/entries/${activeTab}/${room}/checked`, { checked });
        renderProgress();
        updateLastModified();
      } catch (err) {
        console.warn('Could not save checkbox:', err);
      }
    };

    const setAll = async (checked) => {
      try {
        snapshot = await api('PUT', `/api/categories/${activeTab}/all`, { checked });
        renderContent();
        renderProgress();
        updateLastModified();
      } catch (err) {
        console.warn('Could not update category:', err);
      }
    };

    const openNoteModal = (room) => {
      modalRoomEl.textContent = room;
      noteTextarea.value = entryFor(activeTab, room).note || '';
      modal.dataset.room = room;
      modal.dataset.category = activeTab;
      modal.style.display = 'block';
    };

    const closeNoteModal = () => {
      modal.style.display = 'none';
    };

    const saveNote = async () => {
      const { room, category } = modal.dataset;
      try {
        snapshot = await api('PUT', `/api/entries/${category}/${room}/note`, { note: noteTextarea.value });
      } catch (err) {
        console.warn('Could not save note:', err);
      }
      closeNoteModal();
      renderContent();
      updateLastModified();
    };

    const resetAll = async (reason) => {
      snapshot = await api('POST', '/api/reset', { reason });
      renderAll();
      updateLastModified();
      alert('Alle Daten wurden erfolgreich zurückgesetzt.');
    };

    const confirmReset = () =>
      confirm('Sind Sie sicher, dass Sie alle Daten zurücksetzen möchten? Diese Aktion kann nicht rückgängig gemacht werden.');

    const checkAutoReset = async () => {
      const status = await api('GET', '/api/reset/status');
      if (!status.supported || !status.due) {
        return;
      }
      if (confirm('Es sind mehr als 2 Monate seit dem letzten Reset vergangen. Möchten Sie alle Daten zurücksetzen für den neuen Kontrollzyklus?')) {
        if (confirmReset()) {
          await resetAll('auto');
        }
      }
    };

    document.getElementById('cancelNote').addEventListener('click', closeNoteModal);
    modal.querySelector('.close').addEventListener('click', closeNoteModal);
    document.getElementById('saveNote').addEventListener('click', saveNote);
    window.addEventListener('click', (event) => {
      if (event.target === modal) {
        closeNoteModal();
      }
    });
    resetBtn.addEventListener('click', () => {
      if (confirmReset()) {
        resetAll('manual').catch((err) => console.warn('Reset failed:', err));
      }
    });

    const init = async () => {
      snapshot = await api('GET', '/api/checklist');
      renderAll();
      updateLastModified();
      if (snapshot.startup_alert) {
        alert(snapshot.startup_alert);
      }
      await checkAutoReset();
    };

    init().catch((err) => {
      console.error('Could not load checklist:', err);
      alert('Fehler beim Laden der Daten.');
    });
    setInterval(updateLastModified, 60000);
  </script>
</body>
</html>
"#;
